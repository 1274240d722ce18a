use crate::config::{ArchetypeConfig, BossTuning};
use crate::geometry::{Rect, Vec2};
use crate::physics::Body;
use crate::types::{ActorKind, Facing, RuntimeEvent, StateTag};

use super::{expanded_rect, Adversary, Pose, StateClock, UpdateCtx};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BossState {
    Idle,
    Walk,
    Attack,
    Cast,
    Hurt,
    Die,
}

impl BossState {
    fn tag(self) -> StateTag {
        match self {
            Self::Idle => StateTag::Idle,
            Self::Walk => StateTag::Walk,
            Self::Attack => StateTag::Attack,
            Self::Cast => StateTag::Cast,
            Self::Hurt => StateTag::Hurt,
            Self::Die => StateTag::Die,
        }
    }
}

/// Arena anchor. Tracks the player constantly, closes to melee range, and on
/// a fixed interval casts at the spot the player occupied, projecting a
/// hazard that grows over the cast and vanishes with it.
pub struct Boss {
    cfg: ArchetypeConfig,
    tuning: BossTuning,
    body: Body,
    facing: Facing,
    state: StateClock<BossState>,
    health: f32,
    dead: bool,
    next_cast: f64,
    /// Player center-x and feet-y captured when the cast began.
    hazard_anchor: Vec2,
}

impl Boss {
    pub fn new(pos: Vec2) -> Self {
        Self::with_config(ArchetypeConfig::boss(), BossTuning::standard(), pos)
    }

    pub fn with_config(cfg: ArchetypeConfig, tuning: BossTuning, pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, cfg.collision),
            facing: Facing::Left,
            state: StateClock::new(BossState::Idle, 0.0),
            health: cfg.max_health,
            dead: false,
            next_cast: tuning.cast_interval as f64,
            hazard_anchor: Vec2::new(0.0, 0.0),
            cfg,
            tuning,
        }
    }
}

impl Adversary for Boss {
    fn kind(&self) -> ActorKind {
        self.cfg.kind
    }

    fn update(&mut self, ctx: &mut UpdateCtx) {
        match self.state.get() {
            BossState::Die => {
                if self.state.elapsed(ctx.now) >= self.cfg.die_duration {
                    self.dead = true;
                }
                return;
            }
            BossState::Hurt => {
                self.body.apply_gravity(ctx.dt);
                self.body.step_vertical(ctx.level, ctx.dt);
                if self.state.elapsed(ctx.now) >= self.cfg.hurt_duration {
                    self.state.set(BossState::Idle, ctx.now);
                }
                return;
            }
            _ => {}
        }

        if ctx.player_alive {
            self.facing = Facing::toward(self.body.center_x(), ctx.player_hitbox.center_x());
        }

        match self.state.get() {
            BossState::Cast => {
                self.body.apply_gravity(ctx.dt);
                self.body.step_vertical(ctx.level, ctx.dt);
                if self.state.elapsed(ctx.now) >= self.tuning.cast_duration {
                    self.state.set(BossState::Idle, ctx.now);
                }
                return;
            }
            BossState::Attack => {
                self.body.apply_gravity(ctx.dt);
                self.body.step_vertical(ctx.level, ctx.dt);
                if self.state.elapsed(ctx.now) >= self.tuning.attack_duration {
                    self.state.set(BossState::Idle, ctx.now);
                }
                return;
            }
            _ => {}
        }

        self.body.apply_gravity(ctx.dt);

        if self.body.grounded && ctx.player_alive && ctx.now >= self.next_cast {
            self.next_cast = ctx.now + self.tuning.cast_interval as f64;
            self.hazard_anchor = Vec2::new(
                ctx.player_hitbox.center_x(),
                ctx.player_hitbox.bottom(),
            );
            self.state.set(BossState::Cast, ctx.now);
            ctx.events.push(RuntimeEvent::CastStarted {
                x: self.hazard_anchor.x,
                y: self.hazard_anchor.y,
            });
            self.body.step_vertical(ctx.level, ctx.dt);
            return;
        }

        let next = if self.body.grounded && ctx.player_alive {
            let gap = ctx.player_hitbox.center_x() - self.body.center_x();
            if gap.abs() > self.tuning.melee_range {
                let dx = self.cfg.speed * ctx.dt * self.facing.sign();
                self.body.move_horizontal(dx, ctx.level);
                self.body.clamp_to_landing();
                BossState::Walk
            } else {
                BossState::Attack
            }
        } else {
            BossState::Idle
        };
        self.body.step_vertical(ctx.level, ctx.dt);
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
        if self.dead || self.state.get() == BossState::Die {
            return;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.state.set(BossState::Die, now);
        } else {
            self.state.set(BossState::Hurt, now);
        }
    }

    fn health(&self) -> f32 {
        self.health
    }

    fn max_health(&self) -> f32 {
        self.cfg.max_health
    }

    fn is_dying(&self) -> bool {
        self.state.get() == BossState::Die
    }

    fn is_dead(&self) -> bool {
        self.dead
    }

    /// Grows linearly from nothing to `hazard_size` over the cast, planted
    /// bottom-center on the anchor. Gone the moment the cast ends.
    fn hazard(&self, now: f64) -> Option<Rect> {
        if self.state.get() != BossState::Cast {
            return None;
        }
        let t = (self.state.elapsed(now) / self.tuning.cast_duration).clamp(0.0, 1.0);
        let width = self.tuning.hazard_size.x * t;
        let height = self.tuning.hazard_size.y * t;
        Some(Rect::new(
            self.hazard_anchor.x - width * 0.5,
            self.hazard_anchor.y - height,
            width,
            height,
        ))
    }
}
