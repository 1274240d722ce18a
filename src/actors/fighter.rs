use crate::config::FighterConfig;
use crate::constants::FALL_THROUGH_KICK;
use crate::geometry::{Rect, Vec2};
use crate::level::Level;
use crate::physics::Body;
use crate::types::{ActorKind, Facing, FighterView, InputFrame, RuntimeEvent, StateTag};

use super::{Pose, StateClock};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FighterState {
    Idle,
    Run,
    Jump,
    Crouch,
    Attack,
    Combo,
    Die,
}

impl FighterState {
    fn tag(self) -> StateTag {
        match self {
            Self::Idle => StateTag::Idle,
            Self::Run => StateTag::Run,
            Self::Jump => StateTag::Jump,
            Self::Crouch => StateTag::Crouch,
            Self::Attack => StateTag::Attack,
            Self::Combo => StateTag::Combo,
            Self::Die => StateTag::Die,
        }
    }
}

pub struct Fighter {
    cfg: FighterConfig,
    pub body: Body,
    facing: Facing,
    state: StateClock<FighterState>,
    lives: i32,
    invincibility: f32,
    damage_latched: bool,
    next_attack_ready: f64,
    spawn: Vec2,
    defeated: bool,
    crouching: bool,
}

impl Fighter {
    pub fn new(cfg: FighterConfig, spawn: Vec2) -> Self {
        Self {
            body: Body::new(spawn, cfg.collision),
            facing: Facing::Right,
            state: StateClock::new(FighterState::Idle, 0.0),
            lives: cfg.lives,
            invincibility: 0.0,
            damage_latched: false,
            next_attack_ready: 0.0,
            spawn,
            defeated: false,
            crouching: false,
            cfg,
        }
    }

    pub fn update(
        &mut self,
        input: &InputFrame,
        level: &Level,
        dt: f32,
        now: f64,
        events: &mut Vec<RuntimeEvent>,
    ) {
        self.invincibility = (self.invincibility - dt).max(0.0);

        if self.state.get() == FighterState::Die {
            if !self.defeated && self.state.elapsed(now) >= self.cfg.death_duration {
                self.respawn(now, events);
            }
            return;
        }

        let attacking = self.attacking();
        self.crouching = input.down && self.body.grounded && !attacking;

        let mut dx = 0.0;
        if !self.crouching && !attacking {
            if input.left {
                dx -= self.cfg.speed * dt;
            }
            if input.right {
                dx += self.cfg.speed * dt;
            }
        }
        if dx != 0.0 {
            self.facing = if dx > 0.0 {
                Facing::Right
            } else {
                Facing::Left
            };
            self.body.move_horizontal(dx, level);
            self.body.pos.x = self.body.pos.x.clamp(0.0, level.width - self.body.size.x);
        }

        if !attacking {
            let next = if self.crouching {
                FighterState::Crouch
            } else if !self.body.grounded {
                if self.state.get() == FighterState::Jump {
                    FighterState::Jump
                } else {
                    FighterState::Idle
                }
            } else if dx != 0.0 {
                FighterState::Run
            } else {
                FighterState::Idle
            };
            self.state.set(next, now);
        }

        if input.attack_pressed {
            match self.state.get() {
                FighterState::Attack => {
                    // Upgrade restarts the animation clock and the latch.
                    self.state.set(FighterState::Combo, now);
                    self.damage_latched = false;
                }
                FighterState::Combo => {}
                _ => {
                    if now >= self.next_attack_ready {
                        self.state.set(FighterState::Attack, now);
                        self.damage_latched = false;
                    }
                }
            }
        }

        self.body.apply_gravity(dt);

        if input.jump_pressed && self.body.grounded {
            if input.down {
                self.body.begin_fall_through(FALL_THROUGH_KICK);
            } else {
                self.body.velocity_y = self.cfg.jump_velocity;
                self.body.grounded = false;
                self.body.landing = None;
                if !self.attacking() {
                    self.state.set(FighterState::Jump, now);
                }
            }
        }

        self.body.step_vertical(level, dt);

        if self.attacking() {
            let duration = if self.state.get() == FighterState::Combo {
                self.cfg.combo_duration
            } else {
                self.cfg.attack_duration
            };
            if self.state.elapsed(now) >= duration {
                self.state.set(FighterState::Idle, now);
                self.next_attack_ready = now + self.cfg.attack_cooldown as f64;
            }
        }
    }

    /// Body-contact death check against this tick's hazard rectangles.
    pub fn check_hazards(&mut self, hazards: &[Rect], now: f64, events: &mut Vec<RuntimeEvent>) {
        if self.state.get() == FighterState::Die || self.invincibility > 0.0 {
            return;
        }
        let hb = self.hitbox();
        if hazards.iter().any(|h| hb.overlaps(h)) {
            self.begin_death(now, events);
        }
    }

    fn begin_death(&mut self, now: f64, events: &mut Vec<RuntimeEvent>) {
        if self.lives > 0 {
            self.lives -= 1;
        } else {
            self.defeated = true;
        }
        // The death clip is full-frame; swell the box with the feet planted.
        let feet = self.body.feet_y();
        let center = self.body.center_x();
        self.body.size = self.cfg.death_collision;
        self.body.pos.x = center - self.body.size.x * 0.5;
        self.body.pos.y = feet - self.body.size.y;
        self.body.velocity_y = 0.0;
        self.crouching = false;
        self.state.set(FighterState::Die, now);
        events.push(RuntimeEvent::FighterHit {
            lives_left: self.lives,
        });
    }

    fn respawn(&mut self, now: f64, events: &mut Vec<RuntimeEvent>) {
        self.body = Body::new(self.spawn, self.cfg.collision);
        self.body.grounded = true;
        self.invincibility = self.cfg.respawn_invincibility;
        self.damage_latched = false;
        self.state.set(FighterState::Idle, now);
        events.push(RuntimeEvent::FighterRespawned {
            x: self.spawn.x,
            y: self.spawn.y,
        });
    }

    /// Projectile hits cost a life without the death sequence. Returns the
    /// remaining lives when the hit registers.
    pub fn take_projectile_hit(&mut self, invincibility_window: f32) -> Option<i32> {
        if self.invincibility > 0.0 || self.state.get() == FighterState::Die {
            return None;
        }
        if self.lives > 0 {
            self.lives -= 1;
        } else {
            self.defeated = true;
        }
        self.invincibility = invincibility_window;
        Some(self.lives)
    }

    pub fn attack_hitbox(&self) -> Option<Rect> {
        if !self.attacking() {
            return None;
        }
        let hb = self.body.hitbox();
        let width = hb.width * 1.2;
        let height = hb.height * 0.8;
        let x = if self.facing == Facing::Right {
            hb.x + hb.width * 0.5
        } else {
            hb.x + hb.width * 0.5 - width
        };
        Some(Rect::new(x, hb.y + hb.height * 0.1, width, height))
    }

    /// Consumes the swing's damage latch. At most one Some per attack or
    /// combo.
    pub fn try_land_hit(&mut self) -> Option<f32> {
        if !self.attacking() || self.damage_latched {
            return None;
        }
        self.damage_latched = true;
        Some(if self.state.get() == FighterState::Combo {
            self.cfg.combo_damage
        } else {
            self.cfg.attack_damage
        })
    }

    pub fn attacking(&self) -> bool {
        matches!(self.state.get(), FighterState::Attack | FighterState::Combo)
    }

    pub fn is_dying(&self) -> bool {
        self.state.get() == FighterState::Die
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn invincibility(&self) -> f32 {
        self.invincibility
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn hitbox(&self) -> Rect {
        self.body.hitbox()
    }

    pub fn rect(&self) -> Rect {
        let hb = self.body.hitbox();
        if self.state.get() == FighterState::Die {
            return hb;
        }
        let mut rect = Rect::new(
            hb.x - self.cfg.pad_side,
            hb.y - self.cfg.pad_top,
            hb.width + self.cfg.pad_side * 2.0,
            hb.height + self.cfg.pad_top,
        );
        if self.state.get() == FighterState::Crouch {
            let crouched = rect.height * self.cfg.crouch_visual_ratio;
            rect.y += rect.height - crouched;
            rect.height = crouched;
        }
        rect
    }

    pub fn state_tag(&self) -> StateTag {
        self.state.get().tag()
    }

    pub fn pose(&self, now: f64) -> Pose {
        Pose::new(
            ActorKind::Fighter,
            self.state_tag(),
            self.facing,
            self.state.elapsed(now),
        )
    }

    pub fn view(&self, now: f64) -> FighterView {
        let pose = self.pose(now);
        FighterView {
            rect: self.rect(),
            hitbox: self.hitbox(),
            facing: pose.facing,
            state: pose.state,
            elapsed_in_state: pose.elapsed,
            frame: pose.frame,
            lives: self.lives,
            invincibility: self.invincibility,
            grounded: self.body.grounded,
        }
    }
}
