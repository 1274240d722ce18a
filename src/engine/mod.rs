use crate::actors::fighter::Fighter;
use crate::actors::{Adversary, UpdateCtx};
use crate::config::FighterConfig;
use crate::geometry::Rect;
use crate::level::Level;
use crate::rng::Rng;
use crate::types::{
    EngineSummary, GameOverReason, InputFrame, RuntimeEvent, Snapshot, SpearView,
};

mod utils;

use self::utils::{adversary_view, spawn_adversary};

/// Owns one playfield's worth of simulation: the fighter, every adversary
/// the level spawned, and the shared random stream. Time exists only as the
/// sum of the `dt` values fed to `step`, so a seed and an input trace replay
/// a run exactly.
pub struct SimEngine {
    level: Level,
    fighter: Fighter,
    adversaries: Vec<Box<dyn Adversary>>,

    rng: Rng,
    events: Vec<RuntimeEvent>,

    tick: u64,
    now: f64,
    ended: Option<GameOverReason>,
    adversaries_total: usize,
    damage_dealt: f32,
    spears_spawned: u32,
    spears_landed: u32,
}

impl SimEngine {
    pub fn new(level: Level, seed: u32) -> Self {
        let fighter = Fighter::new(FighterConfig::standard(), level.fighter_spawn);
        let adversaries: Vec<Box<dyn Adversary>> = level
            .adversary_spawns
            .iter()
            .filter_map(spawn_adversary)
            .collect();
        let adversaries_total = adversaries.len();

        Self {
            level,
            fighter,
            adversaries,
            rng: Rng::new(seed),
            events: Vec::new(),
            tick: 0,
            now: 0.0,
            ended: None,
            adversaries_total,
            damage_dealt: 0.0,
            spears_spawned: 0,
            spears_landed: 0,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.ended.is_some()
    }

    pub fn ended(&self) -> Option<GameOverReason> {
        self.ended
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn fighter(&self) -> &Fighter {
        &self.fighter
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Advance one frame. A finished run ignores further steps, so callers
    /// can keep a fixed cadence without guarding every call.
    pub fn step(&mut self, dt: f32, input: InputFrame) {
        if self.ended.is_some() {
            return;
        }
        self.tick += 1;
        self.now += dt as f64;
        let events_start = self.events.len();

        self.fighter
            .update(&input, &self.level, dt, self.now, &mut self.events);

        let player_hitbox = self.fighter.hitbox();
        let player_alive = !self.fighter.is_dying();
        for adversary in self.adversaries.iter_mut() {
            if adversary.is_dead() {
                continue;
            }
            let mut ctx = UpdateCtx {
                level: &self.level,
                player_hitbox,
                player_alive,
                dt,
                now: self.now,
                rng: &mut self.rng,
                events: &mut self.events,
            };
            adversary.update(&mut ctx);
        }

        self.resolve_attacks();
        self.resolve_hazards();
        for adversary in self.adversaries.iter_mut() {
            adversary.resolve_player_hits(&mut self.fighter, &mut self.events);
            adversary.update_projectiles(&self.level, dt);
        }

        for event in &self.events[events_start..] {
            match event {
                RuntimeEvent::SpearSpawned { .. } => self.spears_spawned += 1,
                RuntimeEvent::SpearHit { .. } => self.spears_landed += 1,
                _ => {}
            }
        }

        self.check_game_over();
    }

    /// The swing lands on the first live adversary its box reaches; the
    /// latch in `try_land_hit` keeps it to one payout per swing.
    fn resolve_attacks(&mut self) {
        let Some(swing) = self.fighter.attack_hitbox() else {
            return;
        };
        for adversary in self.adversaries.iter_mut() {
            if adversary.is_dying() || adversary.is_dead() {
                continue;
            }
            if !swing.overlaps(&adversary.hitbox()) {
                continue;
            }
            let Some(damage) = self.fighter.try_land_hit() else {
                break;
            };
            adversary.take_damage(damage, self.now);
            self.damage_dealt += damage;
            self.events.push(RuntimeEvent::AdversaryDamaged {
                kind: adversary.kind(),
                health: adversary.health(),
            });
            if adversary.is_dying() {
                self.events.push(RuntimeEvent::AdversaryDied {
                    kind: adversary.kind(),
                });
            }
            break;
        }
    }

    /// Live adversary bodies plus any projected cast area all kill on touch.
    fn resolve_hazards(&mut self) {
        let mut hazards: Vec<Rect> = Vec::new();
        for adversary in self.adversaries.iter() {
            if adversary.is_dying() || adversary.is_dead() {
                continue;
            }
            hazards.push(adversary.hitbox());
            if let Some(area) = adversary.hazard(self.now) {
                hazards.push(area);
            }
        }
        self.fighter
            .check_hazards(&hazards, self.now, &mut self.events);
    }

    fn check_game_over(&mut self) {
        if self.ended.is_some() {
            return;
        }
        if self.fighter.is_defeated() {
            self.ended = Some(GameOverReason::Defeated);
            self.events.push(RuntimeEvent::GameOver {
                reason: GameOverReason::Defeated,
            });
            return;
        }
        if !self.adversaries.is_empty() && self.adversaries.iter().all(|a| a.is_dead()) {
            self.ended = Some(GameOverReason::Cleared);
            self.events.push(RuntimeEvent::LevelCleared);
            self.events.push(RuntimeEvent::GameOver {
                reason: GameOverReason::Cleared,
            });
        }
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        let spears: Vec<SpearView> = self
            .adversaries
            .iter()
            .flat_map(|a| a.spears().iter())
            .map(|s| s.view())
            .collect();
        let snapshot = Snapshot {
            tick: self.tick,
            now: self.now,
            fighter: self.fighter.view(self.now),
            adversaries: self
                .adversaries
                .iter()
                .map(|a| adversary_view(a.as_ref(), self.now))
                .collect(),
            spears,
            cast_hazard: self
                .adversaries
                .iter()
                .find_map(|a| a.hazard(self.now)),
            ended: self.ended,
            events: if include_events {
                self.events.clone()
            } else {
                Vec::new()
            },
        };
        if include_events {
            self.events.clear();
        }
        snapshot
    }

    pub fn build_summary(&self) -> EngineSummary {
        EngineSummary {
            reason: self.ended,
            ticks: self.tick,
            duration: self.now,
            lives_left: self.fighter.lives(),
            adversaries_defeated: self
                .adversaries
                .iter()
                .filter(|a| a.is_dying() || a.is_dead())
                .count(),
            adversaries_total: self.adversaries_total,
            damage_dealt: self.damage_dealt,
            spears_spawned: self.spears_spawned,
            spears_landed: self.spears_landed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;
    use crate::level::{Platform, SpawnSpec, Wall};
    use crate::types::ActorKind;

    const DT: f32 = 1.0 / 60.0;

    fn idle() -> InputFrame {
        InputFrame::default()
    }

    /// One chaser clamped to a raised one-way platform, the fighter on the
    /// floor just past its edge: swings reach it, bodies never touch.
    fn sparring_level() -> Level {
        let mut level = Level::empty();
        level.platforms.push(Platform {
            rect: Rect::new(600.0, 1000.0, 200.0, 40.0),
            is_ground: false,
        });
        level.fighter_spawn = Vec2::new(830.0, 960.0);
        level.adversary_spawns = vec![SpawnSpec {
            kind: ActorKind::Chaser,
            pos: Vec2::new(700.0, 936.0),
        }];
        level
    }

    #[test]
    fn same_seed_produces_same_progression() {
        let mut a = SimEngine::new(Level::level_two(), 424_242);
        let mut b = SimEngine::new(Level::level_two(), 424_242);

        for tick in 0..600u32 {
            let input = InputFrame {
                right: true,
                jump_pressed: tick % 50 == 0,
                attack_pressed: tick % 35 == 0,
                ..Default::default()
            };
            a.step(DT, input);
            b.step(DT, input);
            let sa = serde_json::to_string(&a.build_snapshot(true)).unwrap();
            let sb = serde_json::to_string(&b.build_snapshot(true)).unwrap();
            assert_eq!(sa, sb);
        }
    }

    #[test]
    fn four_swings_fell_the_chaser_and_clear_the_level() {
        let mut engine = SimEngine::new(sparring_level(), 7);
        let mut damaged = 0;
        let mut died = 0;
        let mut cleared = 0;

        for tick in 1..=400u32 {
            let press = matches!(tick, 72 | 144 | 216 | 288);
            engine.step(
                DT,
                InputFrame {
                    left: press,
                    attack_pressed: press,
                    ..Default::default()
                },
            );
            for event in engine.build_snapshot(true).events {
                match event {
                    RuntimeEvent::AdversaryDamaged { .. } => damaged += 1,
                    RuntimeEvent::AdversaryDied { .. } => died += 1,
                    RuntimeEvent::LevelCleared => cleared += 1,
                    RuntimeEvent::FighterHit { .. } => panic!("bodies never touch"),
                    _ => {}
                }
            }
        }

        assert_eq!(damaged, 4, "25 damage per swing into 100 health");
        assert_eq!(died, 1);
        assert_eq!(cleared, 1);
        assert_eq!(engine.ended(), Some(GameOverReason::Cleared));

        let summary = engine.build_summary();
        assert_eq!(summary.reason, Some(GameOverReason::Cleared));
        assert_eq!(summary.damage_dealt, 100.0);
        assert_eq!(summary.adversaries_defeated, 1);
        assert_eq!(summary.adversaries_total, 1);
        assert_eq!(summary.lives_left, 4);

        // A finished run freezes.
        let tick_at_end = engine.tick();
        for _ in 0..10 {
            engine.step(DT, idle());
        }
        assert_eq!(engine.tick(), tick_at_end);
    }

    #[test]
    fn body_contact_costs_a_life() {
        let mut level = Level::empty();
        level.fighter_spawn = Vec2::new(300.0, 960.0);
        level.adversary_spawns = vec![SpawnSpec {
            kind: ActorKind::Chaser,
            pos: Vec2::new(500.0, 1016.0),
        }];
        let mut engine = SimEngine::new(level, 7);

        let mut hit_events = Vec::new();
        for _ in 0..60 {
            engine.step(
                DT,
                InputFrame {
                    right: true,
                    ..Default::default()
                },
            );
            for event in engine.build_snapshot(true).events {
                if let RuntimeEvent::FighterHit { lives_left } = event {
                    hit_events.push(lives_left);
                }
            }
        }

        assert_eq!(hit_events, vec![3], "one contact, one life");
        assert_eq!(engine.fighter().lives(), 3);
        assert!(engine.fighter().is_dying());
        assert_eq!(engine.ended(), None);
    }

    #[test]
    fn five_contacts_end_the_run_defeated() {
        let mut level = Level::empty();
        level.fighter_spawn = Vec2::new(300.0, 960.0);
        level.adversary_spawns = vec![SpawnSpec {
            kind: ActorKind::Chaser,
            pos: Vec2::new(500.0, 1016.0),
        }];
        let mut engine = SimEngine::new(level, 7);

        let mut saw_game_over = false;
        for tick in 1..=2_000u32 {
            // Walk into the chaser once; after that it comes to the spawn.
            engine.step(
                DT,
                InputFrame {
                    right: tick < 15,
                    ..Default::default()
                },
            );
            for event in engine.build_snapshot(true).events {
                if matches!(
                    event,
                    RuntimeEvent::GameOver {
                        reason: GameOverReason::Defeated
                    }
                ) {
                    saw_game_over = true;
                }
            }
            if engine.is_ended() {
                break;
            }
        }

        assert!(saw_game_over);
        assert_eq!(engine.ended(), Some(GameOverReason::Defeated));
        assert_eq!(engine.fighter().lives(), 0);
        assert_eq!(engine.build_summary().reason, Some(GameOverReason::Defeated));
    }

    #[test]
    fn penned_lancer_spears_the_fighter_three_times() {
        let mut level = Level::empty();
        level.fighter_spawn = Vec2::new(1300.0, 960.0);
        // Knee-high wall pens the lancer into the right edge; spears released
        // at hand height fly over it.
        level.walls.push(Wall {
            rect: Rect::new(1600.0, 1020.0, 40.0, 60.0),
            standable_top: false,
        });
        level.adversary_spawns = vec![SpawnSpec {
            kind: ActorKind::Lancer,
            pos: Vec2::new(1700.0, 838.0),
        }];
        let mut engine = SimEngine::new(level, 7);

        for _ in 0..700 {
            engine.step(DT, idle());
        }

        let summary = engine.build_summary();
        assert_eq!(summary.spears_spawned, 3, "one throw per attack cycle");
        assert_eq!(summary.spears_landed, 3);
        assert_eq!(summary.lives_left, 1, "spear hits cost lives quietly");
        assert!(!engine.fighter().is_dying(), "no death sequence on spear hits");
        assert_eq!(engine.ended(), None);
    }

    #[test]
    fn build_snapshot_drains_events_when_requested() {
        let mut engine = SimEngine::new(sparring_level(), 333);
        engine.events.push(RuntimeEvent::LevelCleared);

        let kept = engine.build_snapshot(false);
        assert!(kept.events.is_empty(), "peek does not drain");

        let first = engine.build_snapshot(true);
        let second = engine.build_snapshot(true);
        assert_eq!(first.events.len(), 1);
        assert_eq!(second.events.len(), 0);
    }
}
