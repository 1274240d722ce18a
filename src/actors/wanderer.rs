use crate::config::{ArchetypeConfig, WandererTuning};
use crate::constants::FALL_THROUGH_KICK;
use crate::geometry::{Rect, Vec2};
use crate::physics::Body;
use crate::types::{ActorKind, Facing, StateTag};

use super::{expanded_rect, Adversary, Pose, StateClock, UpdateCtx};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WandererState {
    Idle,
    Walk,
    Hurt,
    Die,
}

impl WandererState {
    fn tag(self) -> StateTag {
        match self {
            Self::Idle => StateTag::Idle,
            Self::Walk => StateTag::Walk,
            Self::Hurt => StateTag::Hurt,
            Self::Die => StateTag::Die,
        }
    }
}

/// Aimless patroller. Ignores the player entirely; every decision (direction
/// flips, hops toward overhead platforms, drops through one-way floors) comes
/// off the engine's random stream, so runs replay exactly under one seed.
pub struct Wanderer {
    cfg: ArchetypeConfig,
    tuning: WandererTuning,
    body: Body,
    facing: Facing,
    state: StateClock<WandererState>,
    health: f32,
    dead: bool,
    flip_timer: f32,
    next_hop_roll: f64,
}

impl Wanderer {
    pub fn new(pos: Vec2) -> Self {
        Self::with_config(ArchetypeConfig::wanderer(), WandererTuning::standard(), pos)
    }

    pub fn with_config(cfg: ArchetypeConfig, tuning: WandererTuning, pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, cfg.collision),
            facing: Facing::Left,
            state: StateClock::new(WandererState::Idle, 0.0),
            health: cfg.max_health,
            dead: false,
            flip_timer: tuning.flip_timer_max,
            next_hop_roll: 0.0,
            cfg,
            tuning,
        }
    }

    fn bounce_off_screen_edges(&mut self, width: f32) {
        if self.body.pos.x <= 0.0 {
            self.body.pos.x = 0.0;
            self.facing = Facing::Right;
        } else if self.body.pos.x + self.body.size.x >= width {
            self.body.pos.x = width - self.body.size.x;
            self.facing = Facing::Left;
        }
    }
}

impl Adversary for Wanderer {
    fn kind(&self) -> ActorKind {
        self.cfg.kind
    }

    fn update(&mut self, ctx: &mut UpdateCtx) {
        match self.state.get() {
            WandererState::Die => {
                if self.state.elapsed(ctx.now) >= self.cfg.die_duration {
                    self.dead = true;
                }
                return;
            }
            WandererState::Hurt => {
                self.body.apply_gravity(ctx.dt);
                self.body.step_vertical(ctx.level, ctx.dt);
                if self.state.elapsed(ctx.now) >= self.cfg.hurt_duration {
                    self.state.set(WandererState::Walk, ctx.now);
                }
                return;
            }
            _ => {}
        }

        self.flip_timer -= ctx.dt;
        if self.flip_timer <= 0.0 {
            self.flip_timer = ctx
                .rng
                .range(self.tuning.flip_timer_min, self.tuning.flip_timer_max);
            if ctx.rng.chance(self.tuning.flip_chance) {
                self.facing = self.facing.flipped();
            }
        }

        self.body.apply_gravity(ctx.dt);

        // Hop toward an overhead platform, at most one roll per cooldown.
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

        if self.body.grounded {
            let step = self.cfg.speed * ctx.dt;
            if self.body.at_ledge(self.facing.sign(), step) {
                match ctx.rng.int(0, 2) {
                    0 => self.facing = self.facing.flipped(),
                    1 => {} // keep going and walk off
                    _ => {
                        // Refused on real ground; then this walks off too.
                        self.body.begin_fall_through(FALL_THROUGH_KICK);
                    }
                }
            } else if !self.body.on_ground_platform() && ctx.rng.one_in(self.tuning.drop_one_in) {
                self.body.begin_fall_through(FALL_THROUGH_KICK);
            }
        }

        let dx = self.cfg.speed * ctx.dt * self.facing.sign();
        if !self.body.move_horizontal(dx, ctx.level) {
            self.facing = self.facing.flipped();
        }
        self.bounce_off_screen_edges(ctx.level.width);

        self.body.step_vertical(ctx.level, ctx.dt);
        let next = if self.body.grounded {
            WandererState::Walk
        } else {
            WandererState::Idle
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
        if self.dead || self.state.get() == WandererState::Die {
            return;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.state.set(WandererState::Die, now);
        } else {
            self.state.set(WandererState::Hurt, now);
        }
    }

    fn health(&self) -> f32 {
        self.health
    }

    fn max_health(&self) -> f32 {
        self.cfg.max_health
    }

    fn is_dying(&self) -> bool {
        self.state.get() == WandererState::Die
    }

    fn is_dead(&self) -> bool {
        self.dead
    }
}
