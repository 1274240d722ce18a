use crate::config::{ArchetypeConfig, ChaserTuning};
use crate::geometry::{Rect, Vec2};
use crate::physics::Body;
use crate::types::{ActorKind, Facing, StateTag};

use super::{expanded_rect, Adversary, Pose, StateClock, UpdateCtx};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ChaserState {
    Idle,
    Walk,
    Hurt,
    Die,
}

impl ChaserState {
    fn tag(self) -> StateTag {
        match self {
            Self::Idle => StateTag::Idle,
            Self::Walk => StateTag::Walk,
            Self::Hurt => StateTag::Hurt,
            Self::Die => StateTag::Die,
        }
    }
}

/// Melee ground-follower: seeks the player's center while grounded and never
/// walks off the platform supporting it.
pub struct Chaser {
    cfg: ArchetypeConfig,
    tuning: ChaserTuning,
    body: Body,
    facing: Facing,
    state: StateClock<ChaserState>,
    health: f32,
    dead: bool,
}

impl Chaser {
    pub fn new(pos: Vec2) -> Self {
        Self::with_config(ArchetypeConfig::chaser(), ChaserTuning::standard(), pos)
    }

    pub fn with_config(cfg: ArchetypeConfig, tuning: ChaserTuning, pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, cfg.collision),
            facing: Facing::Left,
            state: StateClock::new(ChaserState::Idle, 0.0),
            health: cfg.max_health,
            dead: false,
            cfg,
            tuning,
        }
    }
}

impl Adversary for Chaser {
    fn kind(&self) -> ActorKind {
        self.cfg.kind
    }

    fn update(&mut self, ctx: &mut UpdateCtx) {
        match self.state.get() {
            ChaserState::Die => {
                if self.state.elapsed(ctx.now) >= self.cfg.die_duration {
                    self.dead = true;
                }
                return;
            }
            ChaserState::Hurt => {
                self.body.apply_gravity(ctx.dt);
                self.body.step_vertical(ctx.level, ctx.dt);
                if self.state.elapsed(ctx.now) >= self.cfg.hurt_duration {
                    self.state.set(ChaserState::Idle, ctx.now);
                }
                return;
            }
            _ => {}
        }

        self.body.apply_gravity(ctx.dt);

        let mut moving = false;
        if self.body.grounded && ctx.player_alive {
            let target = ctx.player_hitbox.center_x();
            let gap = target - self.body.center_x();
            if gap.abs() > self.tuning.dead_band {
                self.facing = Facing::toward(self.body.center_x(), target);
                let dx = self.cfg.speed * ctx.dt * self.facing.sign();
                moving = self.body.move_horizontal(dx, ctx.level);
                self.body.clamp_to_landing();
            }
        }

        self.body.step_vertical(ctx.level, ctx.dt);
        let next = if moving && self.body.grounded {
            ChaserState::Walk
        } else {
            ChaserState::Idle
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
        if self.dead || self.state.get() == ChaserState::Die {
            return;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.state.set(ChaserState::Die, now);
        } else {
            self.state.set(ChaserState::Hurt, now);
        }
    }

    fn health(&self) -> f32 {
        self.health
    }

    fn max_health(&self) -> f32 {
        self.cfg.max_health
    }

    fn is_dying(&self) -> bool {
        self.state.get() == ChaserState::Die
    }

    fn is_dead(&self) -> bool {
        self.dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Level, Platform};
    use crate::rng::Rng;
    use crate::types::RuntimeEvent;

    const DT: f32 = 1.0 / 60.0;

    fn run_ticks(
        chaser: &mut Chaser,
        level: &Level,
        player: Rect,
        now: &mut f64,
        ticks: u32,
    ) {
        let mut rng = Rng::new(1);
        let mut events: Vec<RuntimeEvent> = Vec::new();
        for _ in 0..ticks {
            *now += DT as f64;
            let mut ctx = UpdateCtx {
                level,
                player_hitbox: player,
                player_alive: true,
                dt: DT,
                now: *now,
                rng: &mut rng,
                events: &mut events,
            };
            chaser.update(&mut ctx);
        }
    }

    fn floor_chaser(level: &Level) -> (Chaser, f64) {
        let pos = Vec2::new(500.0, level.floor_y() - 64.0);
        let mut chaser = Chaser::new(pos);
        let mut now = 0.0;
        let player = Rect::new(500.0, 900.0, 110.0, 120.0);
        run_ticks(&mut chaser, level, player, &mut now, 3);
        assert!(chaser.body.grounded);
        (chaser, now)
    }

    #[test]
    fn walks_toward_the_player_and_idles_in_the_dead_band() {
        let level = Level::empty();
        let (mut chaser, mut now) = floor_chaser(&level);
        let player = Rect::new(900.0, 960.0, 110.0, 120.0);
        let x_before = chaser.body.pos.x;
        run_ticks(&mut chaser, &level, player, &mut now, 30);
        assert!(chaser.body.pos.x > x_before);
        assert_eq!(chaser.pose(now).state, StateTag::Walk);
        assert_eq!(chaser.pose(now).facing, Facing::Right);

        // Long enough to reach the target and settle inside the band.
        run_ticks(&mut chaser, &level, player, &mut now, 600);
        assert_eq!(chaser.pose(now).state, StateTag::Idle);
        let gap = (player.center_x() - chaser.body.center_x()).abs();
        assert!(gap <= 8.0, "gap {gap}");
    }

    #[test]
    fn never_walks_off_its_platform() {
        let mut level = Level::empty();
        level.platforms.push(Platform {
            rect: Rect::new(600.0, 700.0, 200.0, 40.0),
            is_ground: false,
        });
        let mut chaser = Chaser::new(Vec2::new(650.0, 636.0));
        let mut now = 0.0;
        // Player far to the right on the floor below.
        let player = Rect::new(1500.0, 960.0, 110.0, 120.0);
        run_ticks(&mut chaser, &level, player, &mut now, 600);
        assert!(chaser.body.grounded);
        assert_eq!(chaser.body.feet_y(), 700.0, "still on its platform");
        assert_eq!(chaser.body.pos.x, 800.0 - 80.0, "clamped to the edge");
    }

    #[test]
    fn damage_is_monotonic_and_death_fires_once() {
        let level = Level::empty();
        let (mut chaser, now) = floor_chaser(&level);
        chaser.take_damage(60.0, now);
        assert_eq!(chaser.health(), 40.0);
        chaser.take_damage(60.0, now + 0.5);
        assert_eq!(chaser.health(), 0.0, "clamped, never negative");
        assert!(chaser.is_dying());
        let entered = chaser.state.entered_at();
        chaser.take_damage(60.0, now + 0.6);
        assert_eq!(chaser.health(), 0.0);
        assert_eq!(chaser.state.entered_at(), entered, "no second death");
    }

    #[test]
    fn dying_chaser_ignores_the_player_and_expires() {
        let level = Level::empty();
        let (mut chaser, mut now) = floor_chaser(&level);
        chaser.take_damage(200.0, now);
        assert!(chaser.is_dying());
        assert!(!chaser.is_dead());
        let x_before = chaser.body.pos.x;
        let player = Rect::new(1500.0, 960.0, 110.0, 120.0);
        run_ticks(&mut chaser, &level, player, &mut now, 60);
        assert_eq!(chaser.body.pos.x, x_before, "no AI while dying");
        assert!(chaser.is_dead(), "0.6s clip has elapsed");
    }
}
