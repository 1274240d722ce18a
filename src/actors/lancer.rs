use crate::config::{ArchetypeConfig, LancerTuning};
use crate::geometry::{Rect, Vec2};
use crate::level::Level;
use crate::physics::Body;
use crate::projectile::{self, Spear};
use crate::types::{ActorKind, Facing, RuntimeEvent, StateTag};

use super::{expanded_rect, Adversary, Fighter, Pose, StateClock, UpdateCtx};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LancerState {
    Idle,
    Walk,
    Jump,
    Fall,
    Attack,
    Hurt,
    Die,
}

impl LancerState {
    fn tag(self) -> StateTag {
        match self {
            Self::Idle => StateTag::Idle,
            Self::Walk => StateTag::Walk,
            Self::Jump => StateTag::Jump,
            Self::Fall => StateTag::Fall,
            Self::Attack => StateTag::Attack,
            Self::Hurt => StateTag::Hurt,
            Self::Die => StateTag::Die,
        }
    }
}

/// Spear thrower. Paces a walk/idle beat, hops toward overhead platforms,
/// and on a fixed cooldown turns to the player and throws. The spear leaves
/// at a set point in the swing and lives on after the thrower dies.
pub struct Lancer {
    cfg: ArchetypeConfig,
    tuning: LancerTuning,
    body: Body,
    facing: Facing,
    state: StateClock<LancerState>,
    health: f32,
    dead: bool,
    walking: bool,
    phase_timer: f32,
    next_flip_ok: f64,
    next_attack_ready: f64,
    spear_fired: bool,
    next_hop_roll: f64,
    spears: Vec<Spear>,
}

impl Lancer {
    pub fn new(pos: Vec2) -> Self {
        Self::with_config(ArchetypeConfig::lancer(), LancerTuning::standard(), pos)
    }

    pub fn with_config(cfg: ArchetypeConfig, tuning: LancerTuning, pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, cfg.collision),
            facing: Facing::Left,
            state: StateClock::new(LancerState::Idle, 0.0),
            health: cfg.max_health,
            dead: false,
            walking: true,
            phase_timer: tuning.walk_duration,
            next_flip_ok: 0.0,
            next_attack_ready: tuning.attack_cooldown as f64,
            spear_fired: false,
            next_hop_roll: 0.0,
            spears: Vec::new(),
            cfg,
            tuning,
        }
    }

    fn flip_if_allowed(&mut self, now: f64) {
        if now >= self.next_flip_ok {
            self.facing = self.facing.flipped();
            self.next_flip_ok = now + self.tuning.flip_cooldown as f64;
        }
    }

    fn release_spear(&mut self, events: &mut Vec<RuntimeEvent>) {
        let hb = self.body.hitbox();
        let spear_cfg = &self.tuning.spear;
        let origin = Vec2::new(
            match self.facing {
                Facing::Right => hb.right(),
                Facing::Left => hb.x - spear_cfg.size.x,
            },
            hb.y + hb.height * spear_cfg.spawn_height_ratio,
        );
        self.spears.push(Spear::spawn(origin, self.facing, spear_cfg));
        events.push(RuntimeEvent::SpearSpawned {
            x: origin.x,
            y: origin.y,
            facing: self.facing,
        });
    }
}

impl Adversary for Lancer {
    fn kind(&self) -> ActorKind {
        self.cfg.kind
    }

    fn update(&mut self, ctx: &mut UpdateCtx) {
        match self.state.get() {
            LancerState::Die => {
                if self.state.elapsed(ctx.now) >= self.cfg.die_duration {
                    self.dead = true;
                }
                return;
            }
            LancerState::Hurt => {
                self.body.apply_gravity(ctx.dt);
                self.body.step_vertical(ctx.level, ctx.dt);
                if self.state.elapsed(ctx.now) >= self.cfg.hurt_duration {
                    self.state.set(LancerState::Idle, ctx.now);
                }
                return;
            }
            LancerState::Attack => {
                self.body.apply_gravity(ctx.dt);
                self.body.step_vertical(ctx.level, ctx.dt);
                let elapsed = self.state.elapsed(ctx.now);
                if elapsed >= self.tuning.spear_delay && !self.spear_fired {
                    self.spear_fired = true;
                    self.release_spear(ctx.events);
                }
                if elapsed >= self.tuning.attack_duration {
                    self.state.set(LancerState::Idle, ctx.now);
                    self.walking = false;
                    self.phase_timer = self.tuning.idle_duration;
                    self.next_attack_ready = ctx.now + self.tuning.attack_cooldown as f64;
                }
                return;
            }
            _ => {}
        }

        self.body.apply_gravity(ctx.dt);

        if self.body.grounded && ctx.player_alive && ctx.now >= self.next_attack_ready {
            self.facing = Facing::toward(self.body.center_x(), ctx.player_hitbox.center_x());
            self.spear_fired = false;
            self.state.set(LancerState::Attack, ctx.now);
            // No turning right after the throw.
            self.next_flip_ok = ctx.now + self.tuning.post_attack_lock as f64;
            self.body.step_vertical(ctx.level, ctx.dt);
            return;
        }

        if self.body.grounded && ctx.now >= self.next_hop_roll {
            let overhead =
                ctx.level
                    .platform_above(self.body.center_x(), self.body.pos.y, self.tuning.hop.max_gap);
            if overhead.is_some() {
                if ctx.rng.chance(self.tuning.hop.chance) {
                    self.body.velocity_y = self.cfg.jump_velocity;
                    self.body.grounded = false;
                    self.body.landing = None;
                    self.next_hop_roll = ctx.now + self.tuning.hop.cooldown as f64;
                } else {
                    self.next_hop_roll = ctx.now + self.tuning.hop.recheck as f64;
                }
            }
        }

        self.phase_timer -= ctx.dt;
        if self.phase_timer <= 0.0 {
            self.walking = !self.walking;
            self.phase_timer = if self.walking {
                self.tuning.walk_duration
            } else {
                self.tuning.idle_duration
            };
        }

        if self.walking && self.body.grounded {
            let step = self.cfg.speed * ctx.dt;
            if self.body.at_ledge(self.facing.sign(), step) {
                self.flip_if_allowed(ctx.now);
            } else if !self.body.move_horizontal(step * self.facing.sign(), ctx.level) {
                self.flip_if_allowed(ctx.now);
            }
            if self.body.pos.x <= 0.0 {
                self.body.pos.x = 0.0;
                self.facing = Facing::Right;
            } else if self.body.pos.x + self.body.size.x >= ctx.level.width {
                self.body.pos.x = ctx.level.width - self.body.size.x;
                self.facing = Facing::Left;
            }
        }

        self.body.step_vertical(ctx.level, ctx.dt);
        let next = if self.body.grounded {
            if self.walking {
                LancerState::Walk
            } else {
                LancerState::Idle
            }
        } else if self.body.velocity_y < 0.0 {
            LancerState::Jump
        } else {
            LancerState::Fall
        };
        self.state.set(next, ctx.now);
    }

    fn rect(&self) -> Rect {
        expanded_rect(self.body.hitbox(), self.cfg.pad_side, self.cfg.pad_top)
    }

    fn hitbox(&self) -> Rect {
        self.body.hitbox()
    }

    fn pose(&self, now: f64) -> Pose {
        Pose::new(
            self.cfg.kind,
            self.state.get().tag(),
            self.facing,
            self.state.elapsed(now),
        )
    }

    fn take_damage(&mut self, amount: f32, now: f64) {
        if self.dead || self.state.get() == LancerState::Die {
            return;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.state.set(LancerState::Die, now);
        } else {
            self.state.set(LancerState::Hurt, now);
        }
    }

    fn health(&self) -> f32 {
        self.health
    }

    fn max_health(&self) -> f32 {
        self.cfg.max_health
    }

    fn is_dying(&self) -> bool {
        self.state.get() == LancerState::Die
    }

    fn is_dead(&self) -> bool {
        self.dead
    }

    fn resolve_player_hits(&mut self, player: &mut Fighter, events: &mut Vec<RuntimeEvent>) {
        projectile::resolve_player_hits(&mut self.spears, player, &self.tuning.spear, events);
    }

    fn update_projectiles(&mut self, level: &Level, dt: f32) {
        projectile::advance_spears(&mut self.spears, level, dt, &self.tuning.spear);
    }

    fn spears(&self) -> &[Spear] {
        &self.spears
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Rng;

    const DT: f32 = 1.0 / 60.0;

    struct Bench {
        level: Level,
        rng: Rng,
        events: Vec<RuntimeEvent>,
        now: f64,
    }

    impl Bench {
        fn new() -> Self {
            Self {
                level: Level::empty(),
                rng: Rng::new(7),
                events: Vec::new(),
                now: 0.0,
            }
        }

        fn tick(&mut self, lancer: &mut Lancer, player_x: f32) {
            self.now += DT as f64;
            let mut ctx = UpdateCtx {
                level: &self.level,
                player_hitbox: Rect::new(player_x, 960.0, 110.0, 120.0),
                player_alive: true,
                dt: DT,
                now: self.now,
                rng: &mut self.rng,
                events: &mut self.events,
            };
            lancer.update(&mut ctx);
        }
    }

    fn floor_lancer() -> Lancer {
        // 242 tall, feet on the 1080 floor.
        Lancer::new(Vec2::new(960.0, 838.0))
    }

    #[test]
    fn first_throw_waits_out_the_cooldown_and_fires_once() {
        let mut bench = Bench::new();
        let mut lancer = floor_lancer();
        for _ in 0..115 {
            bench.tick(&mut lancer, 1500.0);
        }
        assert_ne!(lancer.pose(bench.now).state, StateTag::Attack);
        assert!(lancer.spears().is_empty());

        for _ in 0..10 {
            bench.tick(&mut lancer, 1500.0);
        }
        assert_eq!(lancer.pose(bench.now).state, StateTag::Attack);
        assert_eq!(lancer.pose(bench.now).facing, Facing::Right);
        assert!(lancer.spears().is_empty(), "spear not released yet");

        for _ in 0..60 {
            bench.tick(&mut lancer, 1500.0);
        }
        assert_eq!(lancer.spears().len(), 1, "one spear per swing");
        let spawned = bench
            .events
            .iter()
            .filter(|e| matches!(e, RuntimeEvent::SpearSpawned { .. }))
            .count();
        assert_eq!(spawned, 1);
        assert_eq!(lancer.pose(bench.now).state, StateTag::Idle);
    }

    #[test]
    fn throw_turns_toward_a_player_on_the_left() {
        let mut bench = Bench::new();
        let mut lancer = floor_lancer();
        for _ in 0..125 {
            bench.tick(&mut lancer, 100.0);
        }
        assert_eq!(lancer.pose(bench.now).state, StateTag::Attack);
        assert_eq!(lancer.pose(bench.now).facing, Facing::Left);
        for _ in 0..60 {
            bench.tick(&mut lancer, 100.0);
        }
        assert_eq!(lancer.spears()[0].facing(), Facing::Left);
        let hb = lancer.hitbox();
        assert!(lancer.spears()[0].rect().right() <= hb.x, "spawned off the lead hand");
    }

    #[test]
    fn patrol_walks_then_pauses_on_the_beat() {
        let mut bench = Bench::new();
        let mut lancer = floor_lancer();
        // Cooldown pushed out so the patrol runs undisturbed.
        lancer.next_attack_ready = 1_000.0;

        for _ in 0..60 {
            bench.tick(&mut lancer, 1500.0);
        }
        assert_eq!(lancer.pose(bench.now).state, StateTag::Walk);
        let x_mid_walk = lancer.body.pos.x;
        assert_ne!(x_mid_walk, 960.0, "covers ground while walking");

        // Walk phase is 2.0s; by 2.2s the idle phase holds it still.
        for _ in 0..72 {
            bench.tick(&mut lancer, 1500.0);
        }
        assert_eq!(lancer.pose(bench.now).state, StateTag::Idle);
        let x_idle = lancer.body.pos.x;
        for _ in 0..30 {
            bench.tick(&mut lancer, 1500.0);
        }
        assert_eq!(lancer.body.pos.x, x_idle, "idle phase does not drift");

        // Idle phase is 1.5s; by 3.8s it walks again.
        for _ in 0..66 {
            bench.tick(&mut lancer, 1500.0);
        }
        assert_eq!(lancer.pose(bench.now).state, StateTag::Walk);
    }

    #[test]
    fn hurt_interrupts_the_swing_and_the_spear_stays_unthrown() {
        let mut bench = Bench::new();
        let mut lancer = floor_lancer();
        for _ in 0..125 {
            bench.tick(&mut lancer, 1500.0);
        }
        assert_eq!(lancer.pose(bench.now).state, StateTag::Attack);
        lancer.take_damage(30.0, bench.now);
        assert_eq!(lancer.pose(bench.now).state, StateTag::Hurt);
        assert_eq!(lancer.health(), 50.0);
        for _ in 0..30 {
            bench.tick(&mut lancer, 1500.0);
        }
        assert!(lancer.spears().is_empty(), "interrupted swing never released");
    }
}
