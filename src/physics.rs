use crate::constants::{FALL_THROUGH_WINDOW, GRAVITY};
use crate::geometry::{Rect, Vec2};
use crate::level::Level;

/// Surface a body most recently landed on. Memoized so actors can reason
/// about the platform under their feet (ledge clamps, fall-through gates)
/// without re-scanning the level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landing {
    pub surface: Rect,
    pub is_ground: bool,
}

/// Shared physics state composed into every actor. `pos` anchors the
/// collision box; visual rectangles are derived by the owner.
#[derive(Clone, Debug)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity_y: f32,
    pub grounded: bool,
    pub landing: Option<Landing>,
    pub fall_through: f32,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            velocity_y: 0.0,
            grounded: false,
            landing: None,
            fall_through: 0.0,
        }
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn feet_y(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x * 0.5
    }

    pub fn on_ground_platform(&self) -> bool {
        matches!(self.landing, Some(l) if l.is_ground)
    }

    /// Opens the pass-through window. Refused while standing on a ground
    /// platform. The downward kick starts the drop on the same tick.
    pub fn begin_fall_through(&mut self, kick: f32) -> bool {
        if !self.grounded || self.on_ground_platform() {
            return false;
        }
        self.fall_through = FALL_THROUGH_WINDOW;
        self.velocity_y = kick;
        self.grounded = false;
        self.landing = None;
        true
    }

    pub fn apply_gravity(&mut self, dt: f32) {
        self.velocity_y += GRAVITY * dt;
    }

    /// Integrates vertical motion and resolves against platforms, standable
    /// wall tops, and the playfield floor. Ties on the surface band resolve
    /// toward landing.
    pub fn step_vertical(&mut self, level: &Level, dt: f32) {
        if self.fall_through > 0.0 {
            self.fall_through = (self.fall_through - dt).max(0.0);
        }
        self.pos.y += self.velocity_y * dt;
        self.grounded = false;
        self.landing = None;

        if self.velocity_y >= 0.0 {
            let feet = self.feet_y();
            let left = self.pos.x;
            let right = self.pos.x + self.size.x;

            for platform in &level.platforms {
                if self.fall_through > 0.0 && !platform.is_ground {
                    continue;
                }
                let surface = platform.rect;
                if right > surface.x
                    && left < surface.right()
                    && feet >= surface.y
                    && feet <= surface.bottom()
                {
                    self.land_on(surface, platform.is_ground);
                    break;
                }
            }

            if !self.grounded {
                for wall in &level.walls {
                    if !wall.standable_top {
                        continue;
                    }
                    let surface = wall.rect;
                    if right > surface.x
                        && left < surface.right()
                        && feet >= surface.y
                        && feet <= surface.bottom()
                    {
                        self.land_on(surface, false);
                        break;
                    }
                }
            }
        }

        let floor = level.floor_y();
        if self.feet_y() >= floor {
            self.land_on(Rect::new(0.0, floor, level.width, 0.0), true);
        }
    }

    fn land_on(&mut self, surface: Rect, is_ground: bool) {
        self.pos.y = surface.y - self.size.y;
        self.velocity_y = 0.0;
        self.grounded = true;
        self.landing = Some(Landing { surface, is_ground });
    }

    /// Moves horizontally unless a wall rejects the axis. Returns whether
    /// the move happened.
    pub fn move_horizontal(&mut self, dx: f32, level: &Level) -> bool {
        if dx == 0.0 {
            return true;
        }
        let target = self.hitbox().translated(dx, 0.0);
        for wall in &level.walls {
            if target.overlaps(&wall.rect) {
                return false;
            }
        }
        self.pos.x += dx;
        true
    }

    /// True when one more step of `lookahead` in `sign`'s direction leaves
    /// the platform currently under the feet.
    pub fn at_ledge(&self, sign: f32, lookahead: f32) -> bool {
        let Some(landing) = self.landing else {
            return false;
        };
        if !self.grounded {
            return false;
        }
        if sign > 0.0 {
            self.pos.x + self.size.x + lookahead > landing.surface.right()
        } else {
            self.pos.x - lookahead < landing.surface.x
        }
    }

    /// Keeps the collision box inside the span of the supporting surface.
    pub fn clamp_to_landing(&mut self) {
        let Some(landing) = self.landing else {
            return;
        };
        let min_x = landing.surface.x;
        let max_x = (landing.surface.right() - self.size.x).max(min_x);
        self.pos.x = self.pos.x.clamp(min_x, max_x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::level::{Level, Platform, Wall};

    const DT: f32 = 1.0 / 60.0;

    fn one_platform_level() -> Level {
        let mut level = Level::empty();
        level.platforms.push(Platform {
            rect: Rect::new(0.0, 500.0, 400.0, 40.0),
            is_ground: false,
        });
        level
    }

    fn settled_body(level: &Level) -> Body {
        let mut body = Body::new(Vec2::new(100.0, 440.0), Vec2::new(50.0, 60.0));
        for _ in 0..10 {
            body.apply_gravity(DT);
            body.step_vertical(level, DT);
        }
        assert!(body.grounded);
        body
    }

    #[test]
    fn grounding_is_idempotent() {
        let level = one_platform_level();
        let mut body = settled_body(&level);
        let before = body.pos;
        body.apply_gravity(DT);
        body.step_vertical(&level, DT);
        assert_eq!(body.pos, before);
        assert!(body.grounded);
        assert_eq!(body.velocity_y, 0.0);
    }

    #[test]
    fn falling_body_lands_exactly_on_the_surface() {
        let level = one_platform_level();
        let mut body = Body::new(Vec2::new(100.0, 430.0), Vec2::new(50.0, 60.0));
        body.velocity_y = 300.0;
        // Feet start at 490, ten units above the surface; one tick moves
        // five units, so it takes a few ticks to reach the band.
        for _ in 0..5 {
            body.step_vertical(&level, DT);
            assert!(body.feet_y() <= 540.0, "never passes through the band");
        }
        assert!(body.grounded);
        assert_eq!(body.feet_y(), 500.0);
        assert_eq!(body.velocity_y, 0.0);
    }

    #[test]
    fn ascending_body_passes_one_way_platforms() {
        let level = one_platform_level();
        let mut body = Body::new(Vec2::new(100.0, 460.0), Vec2::new(50.0, 60.0));
        body.velocity_y = -400.0;
        body.step_vertical(&level, DT);
        assert!(!body.grounded);
        assert!(body.feet_y() < 520.0);
    }

    #[test]
    fn fall_through_window_skips_one_way_platforms_only() {
        let mut level = one_platform_level();
        level.platforms.push(Platform {
            rect: Rect::new(0.0, 700.0, 400.0, 40.0),
            is_ground: true,
        });
        let mut body = settled_body(&level);
        assert!(body.begin_fall_through(100.0));
        let mut landed_on_ground = false;
        for _ in 0..120 {
            body.apply_gravity(DT);
            body.step_vertical(&level, DT);
            if body.grounded {
                landed_on_ground = true;
                break;
            }
        }
        assert!(landed_on_ground);
        assert!(body.on_ground_platform());
        assert_eq!(body.feet_y(), 700.0);
    }

    #[test]
    fn fall_through_refused_on_ground_platforms() {
        let mut level = Level::empty();
        level.platforms.push(Platform {
            rect: Rect::new(0.0, 500.0, 400.0, 40.0),
            is_ground: true,
        });
        let mut body = settled_body(&level);
        assert!(!body.begin_fall_through(100.0));
        assert!(body.grounded);
    }

    #[test]
    fn walls_reject_horizontal_motion() {
        let mut level = Level::empty();
        level.walls.push(Wall {
            rect: Rect::new(200.0, 400.0, 40.0, 200.0),
            standable_top: false,
        });
        let mut body = Body::new(Vec2::new(140.0, 450.0), Vec2::new(50.0, 60.0));
        assert!(body.move_horizontal(5.0, &level));
        assert_eq!(body.pos.x, 145.0);
        assert!(!body.move_horizontal(10.0, &level));
        assert_eq!(body.pos.x, 145.0);
    }

    #[test]
    fn standable_wall_top_lands_like_a_platform() {
        let mut level = Level::empty();
        level.walls.push(Wall {
            rect: Rect::new(100.0, 600.0, 120.0, 200.0),
            standable_top: true,
        });
        let mut body = Body::new(Vec2::new(120.0, 500.0), Vec2::new(50.0, 60.0));
        for _ in 0..60 {
            body.apply_gravity(DT);
            body.step_vertical(&level, DT);
            if body.grounded {
                break;
            }
        }
        assert!(body.grounded);
        assert_eq!(body.feet_y(), 600.0);
        assert!(!body.on_ground_platform());
        // Standing on top, lateral movement along the top is not blocked.
        assert!(body.move_horizontal(4.0, &level));
    }

    #[test]
    fn empty_level_falls_to_the_floor_clamp() {
        let level = Level::empty();
        let mut body = Body::new(Vec2::new(300.0, 0.0), Vec2::new(50.0, 60.0));
        for _ in 0..600 {
            body.apply_gravity(DT);
            body.step_vertical(&level, DT);
        }
        assert!(body.grounded);
        assert_eq!(body.feet_y(), level.floor_y());
        assert!(body.on_ground_platform());
    }

    #[test]
    fn ledge_detection_and_clamp() {
        let level = one_platform_level();
        let mut body = settled_body(&level);
        body.pos.x = 360.0;
        assert!(body.at_ledge(1.0, 5.0), "365 + 50 runs past x=400");
        assert!(!body.at_ledge(-1.0, 5.0));
        body.pos.x = 390.0;
        body.clamp_to_landing();
        assert_eq!(body.pos.x, 350.0);
    }
}
