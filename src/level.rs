use crate::constants::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::geometry::{Rect, Vec2};
use crate::types::ActorKind;

#[derive(Clone, Copy, Debug)]
pub struct Platform {
    pub rect: Rect,
    /// Ground platforms are always solid from above; everything else is
    /// one-way and honors the fall-through window.
    pub is_ground: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct Wall {
    pub rect: Rect,
    /// Standable walls land like platforms on their top edge. All walls
    /// block horizontal traversal.
    pub standable_top: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct SpawnSpec {
    pub kind: ActorKind,
    pub pos: Vec2,
}

#[derive(Clone, Debug)]
pub struct Level {
    pub width: f32,
    pub height: f32,
    pub platforms: Vec<Platform>,
    pub walls: Vec<Wall>,
    pub fighter_spawn: Vec2,
    pub adversary_spawns: Vec<SpawnSpec>,
}

impl Level {
    pub fn empty() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            platforms: Vec::new(),
            walls: Vec::new(),
            fighter_spawn: Vec2::new(100.0, 800.0),
            adversary_spawns: Vec::new(),
        }
    }

    pub fn by_number(number: u32) -> Option<Self> {
        match number {
            1 => Some(Self::level_one()),
            2 => Some(Self::level_two()),
            _ => None,
        }
    }

    /// Flat ground stage: side towers and two floating center spans.
    pub fn level_one() -> Self {
        let mut level = Self::empty();
        level.platforms.push(ground_platform());
        for row in 0..3 {
            let y = 840.0 - 160.0 * row as f32;
            level.platforms.push(one_way(0.0, y, 200.0, 40.0));
            level.platforms.push(one_way(1720.0, y, 200.0, 40.0));
        }
        level.platforms.push(one_way(560.0, 760.0, 800.0, 40.0));
        level.platforms.push(one_way(710.0, 560.0, 500.0, 40.0));
        level.walls.push(Wall {
            rect: Rect::new(1300.0, 880.0, 120.0, 120.0),
            standable_top: true,
        });
        level.adversary_spawns = vec![
            SpawnSpec {
                kind: ActorKind::Chaser,
                pos: Vec2::new(600.0, 930.0),
            },
            SpawnSpec {
                kind: ActorKind::Chaser,
                pos: Vec2::new(1500.0, 930.0),
            },
            SpawnSpec {
                kind: ActorKind::Wanderer,
                pos: Vec2::new(900.0, 700.0),
            },
        ];
        level
    }

    /// Staircase stage with the full adversary roster.
    pub fn level_two() -> Self {
        let mut level = Self::empty();
        level.platforms.push(ground_platform());
        level.platforms.push(one_way(200.0, 880.0, 300.0, 40.0));
        level.platforms.push(one_way(560.0, 760.0, 300.0, 40.0));
        level.platforms.push(one_way(920.0, 640.0, 300.0, 40.0));
        level.platforms.push(one_way(1280.0, 520.0, 300.0, 40.0));
        level.platforms.push(one_way(800.0, 300.0, 400.0, 40.0));
        level.walls.push(Wall {
            rect: Rect::new(940.0, 840.0, 80.0, 160.0),
            standable_top: false,
        });
        level.walls.push(Wall {
            rect: Rect::new(1600.0, 920.0, 100.0, 80.0),
            standable_top: true,
        });
        level.adversary_spawns = vec![
            SpawnSpec {
                kind: ActorKind::Chaser,
                pos: Vec2::new(700.0, 930.0),
            },
            SpawnSpec {
                kind: ActorKind::Wanderer,
                pos: Vec2::new(650.0, 700.0),
            },
            SpawnSpec {
                kind: ActorKind::Lancer,
                pos: Vec2::new(950.0, 50.0),
            },
            SpawnSpec {
                kind: ActorKind::Boss,
                pos: Vec2::new(1350.0, 889.0),
            },
        ];
        level
    }

    /// Catch-all floor under any layout.
    pub fn floor_y(&self) -> f32 {
        self.height
    }

    /// Nearest platform straight above `top_y` whose span contains
    /// `center_x`, within `max_gap`. Jump targeting for the hoppers.
    pub fn platform_above(&self, center_x: f32, top_y: f32, max_gap: f32) -> Option<&Platform> {
        self.platforms
            .iter()
            .filter(|p| p.rect.y < top_y && top_y - p.rect.y <= max_gap)
            .filter(|p| center_x >= p.rect.x && center_x <= p.rect.right())
            .max_by(|a, b| a.rect.y.total_cmp(&b.rect.y))
    }
}

fn ground_platform() -> Platform {
    Platform {
        rect: Rect::new(
            0.0,
            PLAYFIELD_HEIGHT - crate::constants::GROUND_BAND_HEIGHT,
            PLAYFIELD_WIDTH,
            crate::constants::GROUND_BAND_HEIGHT,
        ),
        is_ground: true,
    }
}

fn one_way(x: f32, y: f32, width: f32, height: f32) -> Platform {
    Platform {
        rect: Rect::new(x, y, width, height),
        is_ground: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookup() {
        assert!(Level::by_number(1).is_some());
        assert!(Level::by_number(2).is_some());
        assert!(Level::by_number(3).is_none());
        assert!(Level::by_number(0).is_none());
    }

    #[test]
    fn levels_always_carry_a_ground_platform() {
        for number in 1..=2 {
            let level = Level::by_number(number).unwrap();
            let ground: Vec<_> = level.platforms.iter().filter(|p| p.is_ground).collect();
            assert_eq!(ground.len(), 1);
            assert_eq!(ground[0].rect.x, 0.0);
            assert_eq!(ground[0].rect.width, level.width);
        }
    }

    #[test]
    fn platform_above_picks_the_nearest() {
        let level = Level::level_two();
        // Standing on the 880 step, looking up from its top edge.
        let found = level.platform_above(350.0, 880.0, 300.0);
        assert!(found.is_none(), "nothing within reach above the first step");
        let found = level.platform_above(700.0, 880.0, 300.0);
        assert_eq!(found.map(|p| p.rect.y), Some(760.0));
    }

    #[test]
    fn platform_above_requires_alignment() {
        let level = Level::level_one();
        // Center span sits at x 560..1360, y 760.
        assert!(level.platform_above(900.0, 1000.0, 300.0).is_some());
        assert!(level.platform_above(300.0, 1000.0, 300.0).is_none());
    }
}
