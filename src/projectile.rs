use crate::actors::fighter::Fighter;
use crate::animation::clips;
use crate::config::SpearConfig;
use crate::constants::OFFSCREEN_MARGIN;
use crate::geometry::{Rect, Vec2};
use crate::level::Level;
use crate::types::{Facing, RuntimeEvent, SpearView};

/// Straight-line projectile. Pure value type; the throwing adversary owns
/// the collection.
#[derive(Clone, Debug)]
pub struct Spear {
    pos: Vec2,
    size: Vec2,
    velocity_x: f32,
    age: f32,
    pub alive: bool,
}

impl Spear {
    pub fn spawn(origin: Vec2, facing: Facing, cfg: &SpearConfig) -> Self {
        Self {
            pos: origin,
            size: cfg.size,
            velocity_x: cfg.speed * facing.sign(),
            age: 0.0,
            alive: true,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn facing(&self) -> Facing {
        if self.velocity_x < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }

    pub fn view(&self) -> SpearView {
        SpearView {
            rect: self.rect(),
            facing: self.facing(),
            frame: clips::lancer::SPEAR.frame_at(self.age),
        }
    }

    fn advance(&mut self, level: &Level, dt: f32, lifetime: f32) {
        self.age += dt;
        self.pos.x += self.velocity_x * dt;
        if self.age >= lifetime {
            self.alive = false;
            return;
        }
        let rect = self.rect();
        if rect.right() < -OFFSCREEN_MARGIN || rect.x > level.width + OFFSCREEN_MARGIN {
            self.alive = false;
            return;
        }
        if level.platforms.iter().any(|p| rect.overlaps(&p.rect))
            || level.walls.iter().any(|w| rect.overlaps(&w.rect))
        {
            self.alive = false;
        }
    }
}

/// Integrate every live spear, then compact the collection. One pass per
/// tick; hits marked earlier in the tick are swept out here too.
pub fn advance_spears(spears: &mut Vec<Spear>, level: &Level, dt: f32, cfg: &SpearConfig) {
    for spear in spears.iter_mut() {
        if spear.alive {
            spear.advance(level, dt, cfg.lifetime);
        }
    }
    spears.retain(|s| s.alive);
}

/// Spear-vs-player resolution. A registered hit costs a life and grants the
/// short invincibility window; an invincible player lets the spear fly on.
pub fn resolve_player_hits(
    spears: &mut [Spear],
    player: &mut Fighter,
    cfg: &SpearConfig,
    events: &mut Vec<RuntimeEvent>,
) {
    for spear in spears.iter_mut() {
        if !spear.alive || !spear.rect().overlaps(&player.hitbox()) {
            continue;
        }
        if let Some(lives_left) = player.take_projectile_hit(cfg.hit_invincibility) {
            events.push(RuntimeEvent::SpearHit { lives_left });
            spear.alive = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FighterConfig;
    use crate::level::Platform;

    const DT: f32 = 1.0 / 60.0;

    fn cfg() -> SpearConfig {
        SpearConfig::standard()
    }

    #[test]
    fn crosses_two_hundred_units_in_two_thirds_of_a_second() {
        let level = Level::empty();
        let mut spears = vec![Spear::spawn(
            Vec2::new(0.0, 500.0),
            Facing::Right,
            &cfg(),
        )];
        let target_x = 200.0;
        let mut elapsed = 0.0f32;
        while spears[0].rect().x < target_x {
            advance_spears(&mut spears, &level, DT, &cfg());
            elapsed += DT;
            assert!(!spears.is_empty(), "spear must survive the approach");
        }
        assert!((0.6..0.75).contains(&elapsed), "elapsed {elapsed}");
    }

    #[test]
    fn platform_in_the_path_stops_the_spear() {
        let mut level = Level::empty();
        level.platforms.push(Platform {
            rect: Rect::new(100.0, 480.0, 40.0, 60.0),
            is_ground: false,
        });
        let mut spears = vec![Spear::spawn(
            Vec2::new(0.0, 500.0),
            Facing::Right,
            &cfg(),
        )];
        for _ in 0..120 {
            advance_spears(&mut spears, &level, DT, &cfg());
            if spears.is_empty() {
                break;
            }
            assert!(spears[0].rect().x < 150.0, "never passes the platform");
        }
        assert!(spears.is_empty());
    }

    #[test]
    fn lifetime_expiry_compacts_the_collection() {
        let level = Level::empty();
        let mut spears = vec![Spear::spawn(
            Vec2::new(900.0, 500.0),
            Facing::Left,
            &cfg(),
        )];
        let ticks = (cfg().lifetime / DT).ceil() as u32 + 1;
        for _ in 0..ticks {
            advance_spears(&mut spears, &level, DT, &cfg());
        }
        assert!(spears.is_empty());
    }

    #[test]
    fn offscreen_spears_despawn_past_the_margin() {
        let level = Level::empty();
        let mut spears = vec![Spear::spawn(
            Vec2::new(30.0, 500.0),
            Facing::Left,
            &cfg(),
        )];
        for _ in 0..60 {
            advance_spears(&mut spears, &level, DT, &cfg());
        }
        assert!(spears.is_empty());
    }

    #[test]
    fn hit_costs_a_life_and_respects_invincibility() {
        let level = Level::empty();
        let mut events = Vec::new();
        let mut player = Fighter::new(FighterConfig::standard(), Vec2::new(300.0, 960.0));
        let hb = player.hitbox();
        let mut spears = vec![Spear::spawn(
            Vec2::new(hb.x + 10.0, hb.y + 10.0),
            Facing::Right,
            &cfg(),
        )];
        resolve_player_hits(&mut spears, &mut player, &cfg(), &mut events);
        assert_eq!(player.lives(), 3);
        assert!(!spears[0].alive);
        assert_eq!(events.len(), 1);

        // Second spear arrives during the invincibility window and passes.
        let mut more = vec![Spear::spawn(
            Vec2::new(hb.x + 10.0, hb.y + 10.0),
            Facing::Right,
            &cfg(),
        )];
        resolve_player_hits(&mut more, &mut player, &cfg(), &mut events);
        assert_eq!(player.lives(), 3);
        assert!(more[0].alive);
        advance_spears(&mut more, &level, DT, &cfg());
        assert_eq!(more.len(), 1);
    }
}
