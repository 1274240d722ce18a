use crate::actors::boss::Boss;
use crate::actors::chaser::Chaser;
use crate::actors::lancer::Lancer;
use crate::actors::wanderer::Wanderer;
use crate::actors::Adversary;
use crate::level::SpawnSpec;
use crate::types::{ActorKind, AdversaryView};

/// Instantiate the adversary a spawn entry calls for. A fighter entry in the
/// adversary table is a level-authoring mistake and spawns nothing.
pub(super) fn spawn_adversary(spec: &SpawnSpec) -> Option<Box<dyn Adversary>> {
    match spec.kind {
        ActorKind::Chaser => Some(Box::new(Chaser::new(spec.pos))),
        ActorKind::Wanderer => Some(Box::new(Wanderer::new(spec.pos))),
        ActorKind::Lancer => Some(Box::new(Lancer::new(spec.pos))),
        ActorKind::Boss => Some(Box::new(Boss::new(spec.pos))),
        ActorKind::Fighter => None,
    }
}

pub(super) fn adversary_view(adversary: &dyn Adversary, now: f64) -> AdversaryView {
    let pose = adversary.pose(now);
    AdversaryView {
        kind: adversary.kind(),
        rect: adversary.rect(),
        hitbox: adversary.hitbox(),
        facing: pose.facing,
        state: pose.state,
        elapsed_in_state: pose.elapsed,
        frame: pose.frame,
        health: adversary.health(),
        max_health: adversary.max_health(),
        dying: adversary.is_dying(),
        dead: adversary.is_dead(),
    }
}
