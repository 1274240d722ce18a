use serde::Serialize;

use crate::geometry::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Facing that looks from `from_x` toward `to_x`. Ties look left, the
    /// direction adversaries spawn facing.
    pub fn toward(from_x: f32, to_x: f32) -> Self {
        if to_x > from_x {
            Self::Right
        } else {
            Self::Left
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    Fighter,
    Chaser,
    Wanderer,
    Lancer,
    Boss,
}

/// Cross-kind state label used by snapshots and the clip catalog. Each actor
/// keeps its own closed state enum and maps onto these tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateTag {
    Idle,
    Walk,
    Run,
    Jump,
    Fall,
    Crouch,
    Attack,
    Combo,
    Cast,
    Hurt,
    Die,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    Cleared,
    Defeated,
}

/// One tick of sampled input. Movement and crouch are level-triggered, jump
/// and attack are edge-triggered by the input collaborator.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct InputFrame {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    #[serde(rename = "jumpPressed")]
    pub jump_pressed: bool,
    #[serde(rename = "attackPressed")]
    pub attack_pressed: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct FighterView {
    pub rect: Rect,
    pub hitbox: Rect,
    pub facing: Facing,
    pub state: StateTag,
    #[serde(rename = "elapsedInState")]
    pub elapsed_in_state: f32,
    pub frame: u32,
    pub lives: i32,
    pub invincibility: f32,
    pub grounded: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct AdversaryView {
    pub kind: ActorKind,
    pub rect: Rect,
    pub hitbox: Rect,
    pub facing: Facing,
    pub state: StateTag,
    #[serde(rename = "elapsedInState")]
    pub elapsed_in_state: f32,
    pub frame: u32,
    pub health: f32,
    #[serde(rename = "maxHealth")]
    pub max_health: f32,
    pub dying: bool,
    pub dead: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct SpearView {
    pub rect: Rect,
    pub facing: Facing,
    pub frame: u32,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    AdversaryDamaged {
        kind: ActorKind,
        health: f32,
    },
    AdversaryDied {
        kind: ActorKind,
    },
    FighterHit {
        #[serde(rename = "livesLeft")]
        lives_left: i32,
    },
    FighterRespawned {
        x: f32,
        y: f32,
    },
    SpearSpawned {
        x: f32,
        y: f32,
        facing: Facing,
    },
    SpearHit {
        #[serde(rename = "livesLeft")]
        lives_left: i32,
    },
    CastStarted {
        x: f32,
        y: f32,
    },
    LevelCleared,
    GameOver {
        reason: GameOverReason,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub now: f64,
    pub fighter: FighterView,
    pub adversaries: Vec<AdversaryView>,
    pub spears: Vec<SpearView>,
    #[serde(rename = "castHazard")]
    pub cast_hazard: Option<Rect>,
    pub ended: Option<GameOverReason>,
    pub events: Vec<RuntimeEvent>,
}

#[derive(Clone, Debug, Serialize)]
pub struct EngineSummary {
    pub reason: Option<GameOverReason>,
    pub ticks: u64,
    pub duration: f64,
    #[serde(rename = "livesLeft")]
    pub lives_left: i32,
    #[serde(rename = "adversariesDefeated")]
    pub adversaries_defeated: usize,
    #[serde(rename = "adversariesTotal")]
    pub adversaries_total: usize,
    #[serde(rename = "damageDealt")]
    pub damage_dealt: f32,
    #[serde(rename = "spearsSpawned")]
    pub spears_spawned: u32,
    #[serde(rename = "spearsLanded")]
    pub spears_landed: u32,
}
