pub mod boss;
pub mod chaser;
pub mod fighter;
pub mod lancer;
pub mod wanderer;

use crate::animation::clip_for;
use crate::geometry::Rect;
use crate::level::Level;
use crate::projectile::Spear;
use crate::rng::Rng;
use crate::types::{ActorKind, Facing, RuntimeEvent, StateTag};

use fighter::Fighter;

/// State plus the timestamp it was entered. Every timed behavior reads
/// `elapsed(now)`, so re-entering a state restarts its timers and entering
/// the same state twice is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct StateClock<S> {
    current: S,
    entered_at: f64,
}

impl<S: Copy + PartialEq> StateClock<S> {
    pub fn new(initial: S, now: f64) -> Self {
        Self {
            current: initial,
            entered_at: now,
        }
    }

    pub fn get(&self) -> S {
        self.current
    }

    /// Transition to `next`, resetting the clock. Returns false (and keeps
    /// the clock running) when `next` is already current.
    pub fn set(&mut self, next: S, now: f64) -> bool {
        if next == self.current {
            return false;
        }
        self.current = next;
        self.entered_at = now;
        true
    }

    pub fn elapsed(&self, now: f64) -> f32 {
        (now - self.entered_at).max(0.0) as f32
    }

    pub fn entered_at(&self) -> f64 {
        self.entered_at
    }
}

/// What the renderer needs to draw an actor this frame.
#[derive(Clone, Copy, Debug)]
pub struct Pose {
    pub state: StateTag,
    pub facing: Facing,
    pub elapsed: f32,
    pub frame: u32,
}

impl Pose {
    pub fn new(kind: ActorKind, state: StateTag, facing: Facing, elapsed: f32) -> Self {
        Self {
            state,
            facing,
            elapsed,
            frame: clip_for(kind, state).frame_at(elapsed),
        }
    }
}

/// Visual rectangle for a collision box: padded sideways and upward, feet
/// kept planted so the sprite sits on the same surface as the box.
pub fn expanded_rect(hitbox: Rect, pad_side: f32, pad_top: f32) -> Rect {
    Rect::new(
        hitbox.x - pad_side,
        hitbox.y - pad_top,
        hitbox.width + pad_side * 2.0,
        hitbox.height + pad_top,
    )
}

/// Per-tick context handed to each adversary. The engine owns the random
/// source and the event buffer; adversaries never reach into each other.
pub struct UpdateCtx<'a> {
    pub level: &'a Level,
    pub player_hitbox: Rect,
    pub player_alive: bool,
    pub dt: f32,
    pub now: f64,
    pub rng: &'a mut Rng,
    pub events: &'a mut Vec<RuntimeEvent>,
}

/// Capability contract every adversary kind implements independently. No
/// shared storage; cross-actor effects go through these methods only.
pub trait Adversary {
    fn kind(&self) -> ActorKind;
    fn update(&mut self, ctx: &mut UpdateCtx);
    fn rect(&self) -> Rect;
    fn hitbox(&self) -> Rect;
    fn pose(&self, now: f64) -> Pose;
    fn take_damage(&mut self, amount: f32, now: f64);
    fn health(&self) -> f32;
    fn max_health(&self) -> f32;
    /// Death animation running; already out of play.
    fn is_dying(&self) -> bool;
    /// Death animation finished; removable.
    fn is_dead(&self) -> bool;

    /// Area hazard projected by the actor this tick, if any.
    fn hazard(&self, _now: f64) -> Option<Rect> {
        None
    }

    fn resolve_player_hits(&mut self, _player: &mut Fighter, _events: &mut Vec<RuntimeEvent>) {}

    fn update_projectiles(&mut self, _level: &Level, _dt: f32) {}

    fn spears(&self) -> &[Spear] {
        &[]
    }
}
