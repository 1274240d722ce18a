use crate::animation::clips;
use crate::geometry::Vec2;
use crate::types::ActorKind;

/// Common tuning shared by every adversary archetype. The source material
/// scattered near-duplicate constants across each enemy; here each archetype
/// constructor owns its canonical numbers and the actors read only config.
///
/// `collision` is the hitbox size; the visual rect is the hitbox expanded by
/// `pad_side` on both sides and `pad_top` above (feet stay shared).
#[derive(Clone, Copy, Debug)]
pub struct ArchetypeConfig {
    pub kind: ActorKind,
    pub collision: Vec2,
    pub pad_side: f32,
    pub pad_top: f32,
    pub max_health: f32,
    pub speed: f32,
    pub hurt_duration: f32,
    pub die_duration: f32,
    pub jump_velocity: f32,
}

impl ArchetypeConfig {
    pub fn chaser() -> Self {
        Self {
            kind: ActorKind::Chaser,
            collision: Vec2::new(80.0, 64.0),
            pad_side: 10.0,
            pad_top: 8.0,
            max_health: 100.0,
            speed: 180.0,
            hurt_duration: 0.4,
            die_duration: clips::chaser::DIE.duration(),
            jump_velocity: 0.0,
        }
    }

    pub fn wanderer() -> Self {
        Self {
            kind: ActorKind::Wanderer,
            collision: Vec2::new(72.0, 48.0),
            pad_side: 8.0,
            pad_top: 6.0,
            max_health: 50.0,
            speed: 180.0,
            hurt_duration: 0.4,
            die_duration: clips::wanderer::DIE.duration(),
            jump_velocity: -600.0,
        }
    }

    pub fn lancer() -> Self {
        Self {
            kind: ActorKind::Lancer,
            collision: Vec2::new(105.0, 242.0),
            pad_side: 135.0,
            pad_top: 133.0,
            max_health: 80.0,
            speed: 120.0,
            hurt_duration: 0.4,
            die_duration: clips::lancer::DIE.duration(),
            jump_velocity: -600.0,
        }
    }

    pub fn boss() -> Self {
        Self {
            kind: ActorKind::Boss,
            collision: Vec2::new(170.0, 111.0),
            pad_side: 55.0,
            pad_top: 75.0,
            max_health: 500.0,
            speed: 120.0,
            hurt_duration: 0.4,
            die_duration: clips::boss::DIE.duration(),
            jump_velocity: 0.0,
        }
    }
}

/// Platform-above jump rolls shared by the hopping archetypes.
#[derive(Clone, Copy, Debug)]
pub struct HopTuning {
    pub chance: f32,
    pub max_gap: f32,
    pub cooldown: f32,
    /// Delay before re-rolling after a declined jump.
    pub recheck: f32,
}

impl HopTuning {
    pub fn standard() -> Self {
        Self {
            chance: 0.25,
            max_gap: 300.0,
            cooldown: 0.5,
            recheck: 0.4,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ChaserTuning {
    /// Horizontal distance to the player's center inside which the chaser
    /// stops pushing instead of oscillating over the target.
    pub dead_band: f32,
}

impl ChaserTuning {
    pub fn standard() -> Self {
        Self { dead_band: 4.0 }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct WandererTuning {
    pub flip_timer_min: f32,
    pub flip_timer_max: f32,
    pub flip_chance: f32,
    pub hop: HopTuning,
    /// Odds per grounded tick of dropping through a one-way platform.
    pub drop_one_in: u32,
}

impl WandererTuning {
    pub fn standard() -> Self {
        Self {
            flip_timer_min: 1.0,
            flip_timer_max: 3.0,
            flip_chance: 0.5,
            hop: HopTuning::standard(),
            drop_one_in: 300,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LancerTuning {
    pub walk_duration: f32,
    pub idle_duration: f32,
    pub flip_cooldown: f32,
    pub attack_cooldown: f32,
    pub attack_duration: f32,
    /// Elapsed-in-attack at which the spear leaves the hand, exactly once.
    pub spear_delay: f32,
    pub post_attack_lock: f32,
    pub hop: HopTuning,
    pub spear: SpearConfig,
}

impl LancerTuning {
    pub fn standard() -> Self {
        Self {
            walk_duration: 2.0,
            idle_duration: 1.5,
            flip_cooldown: 1.0,
            attack_cooldown: 2.0,
            attack_duration: clips::lancer::ATTACK.duration(),
            spear_delay: clips::lancer::ATTACK.duration(),
            post_attack_lock: 1.0,
            hop: HopTuning::standard(),
            spear: SpearConfig::standard(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct BossTuning {
    pub melee_range: f32,
    pub attack_duration: f32,
    pub cast_interval: f32,
    pub cast_duration: f32,
    pub hazard_size: Vec2,
}

impl BossTuning {
    pub fn standard() -> Self {
        Self {
            melee_range: 200.0,
            attack_duration: clips::boss::ATTACK.duration(),
            cast_interval: 6.0,
            cast_duration: clips::boss::SPELL.duration(),
            hazard_size: Vec2::new(160.0, 160.0),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SpearConfig {
    pub speed: f32,
    pub size: Vec2,
    pub lifetime: f32,
    pub hit_invincibility: f32,
    /// Spawn height as a fraction of the thrower's collision height.
    pub spawn_height_ratio: f32,
}

impl SpearConfig {
    pub fn standard() -> Self {
        Self {
            speed: 300.0,
            size: Vec2::new(60.0, 20.0),
            lifetime: 2.0,
            hit_invincibility: 2.0,
            // Hand height chosen so a throw lines up with a grounded
            // fighter's hitbox on level footing.
            spawn_height_ratio: 0.55,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FighterConfig {
    pub collision: Vec2,
    pub pad_side: f32,
    pub pad_top: f32,
    /// The death clip is full-frame, so the collision box swells to the
    /// sprite square for the duration of the death sequence.
    pub death_collision: Vec2,
    pub speed: f32,
    pub jump_velocity: f32,
    pub crouch_visual_ratio: f32,
    pub attack_cooldown: f32,
    pub attack_damage: f32,
    pub combo_damage: f32,
    pub attack_duration: f32,
    pub combo_duration: f32,
    pub lives: i32,
    pub death_duration: f32,
    pub respawn_invincibility: f32,
}

impl FighterConfig {
    pub fn standard() -> Self {
        Self {
            collision: Vec2::new(110.0, 120.0),
            pad_side: 15.0,
            pad_top: 20.0,
            death_collision: Vec2::new(140.0, 140.0),
            speed: 300.0,
            jump_velocity: -500.0,
            crouch_visual_ratio: 0.9,
            attack_cooldown: 0.45,
            attack_damage: 25.0,
            combo_damage: 40.0,
            attack_duration: clips::fighter::ATTACK.duration(),
            combo_duration: clips::fighter::COMBO.duration(),
            lives: 4,
            death_duration: 2.0,
            respawn_invincibility: 2.0,
        }
    }
}
