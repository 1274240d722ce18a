use crate::types::{ActorKind, StateTag};

/// Sprite-strip timing. The simulation never touches pixels; it only needs
/// each clip's frame count and rate to time state transitions and to hand a
/// frame index to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clip {
    pub frames: u32,
    pub fps: f32,
    pub looping: bool,
}

impl Clip {
    pub const fn looped(frames: u32, fps: f32) -> Self {
        Self {
            frames,
            fps,
            looping: true,
        }
    }

    pub const fn once(frames: u32, fps: f32) -> Self {
        Self {
            frames,
            fps,
            looping: false,
        }
    }

    pub fn duration(&self) -> f32 {
        if self.fps <= 0.0 {
            return 0.0;
        }
        self.frames as f32 / self.fps
    }

    pub fn frame_at(&self, elapsed: f32) -> u32 {
        if self.frames == 0 {
            return 0;
        }
        let idx = (elapsed.max(0.0) * self.fps) as u32;
        if self.looping {
            idx % self.frames
        } else {
            idx.min(self.frames - 1)
        }
    }
}

pub mod clips {
    use super::Clip;

    pub mod fighter {
        use super::Clip;

        pub const IDLE: Clip = Clip::looped(6, 10.0);
        pub const RUN: Clip = Clip::looped(8, 10.0);
        pub const JUMP: Clip = Clip::once(14, 10.0);
        pub const CROUCH: Clip = Clip::once(3, 10.0);
        pub const ATTACK: Clip = Clip::once(6, 10.0);
        pub const COMBO: Clip = Clip::once(8, 10.0);
        pub const DEATH: Clip = Clip::once(12, 10.0);
    }

    pub mod chaser {
        use super::Clip;

        pub const IDLE: Clip = Clip::looped(6, 8.0);
        pub const WALK: Clip = Clip::looped(8, 10.0);
        pub const HURT: Clip = Clip::once(3, 10.0);
        pub const DIE: Clip = Clip::once(6, 10.0);
    }

    pub mod wanderer {
        use super::Clip;

        pub const IDLE: Clip = Clip::looped(5, 10.0);
        pub const WALK: Clip = Clip::looped(15, 10.0);
        pub const HURT: Clip = Clip::once(3, 10.0);
        pub const DIE: Clip = Clip::once(6, 10.0);
    }

    pub mod lancer {
        use super::Clip;

        pub const IDLE: Clip = Clip::looped(8, 10.0);
        pub const WALK: Clip = Clip::looped(8, 10.0);
        pub const JUMP: Clip = Clip::once(2, 10.0);
        pub const FALL: Clip = Clip::once(2, 10.0);
        pub const ATTACK: Clip = Clip::once(7, 7.0);
        pub const HURT: Clip = Clip::once(3, 10.0);
        pub const DIE: Clip = Clip::once(8, 10.0);
        pub const SPEAR: Clip = Clip::looped(4, 10.0);
    }

    pub mod boss {
        use super::Clip;

        pub const IDLE: Clip = Clip::looped(8, 10.0);
        pub const WALK: Clip = Clip::looped(8, 10.0);
        pub const ATTACK: Clip = Clip::once(10, 10.0);
        pub const CAST: Clip = Clip::once(9, 10.0);
        pub const SPELL: Clip = Clip::once(16, 10.0);
        pub const HURT: Clip = Clip::once(3, 10.0);
        pub const DIE: Clip = Clip::once(10, 10.0);
    }
}

/// Lookup the renderer uses to turn a pose into a frame index. Unmapped
/// combinations fall back to the kind's idle clip.
pub fn clip_for(kind: ActorKind, state: StateTag) -> Clip {
    use clips::*;
    match kind {
        ActorKind::Fighter => match state {
            StateTag::Run => fighter::RUN,
            StateTag::Jump => fighter::JUMP,
            StateTag::Crouch => fighter::CROUCH,
            StateTag::Attack => fighter::ATTACK,
            StateTag::Combo => fighter::COMBO,
            StateTag::Die => fighter::DEATH,
            _ => fighter::IDLE,
        },
        ActorKind::Chaser => match state {
            StateTag::Walk => chaser::WALK,
            StateTag::Hurt => chaser::HURT,
            StateTag::Die => chaser::DIE,
            _ => chaser::IDLE,
        },
        ActorKind::Wanderer => match state {
            StateTag::Walk => wanderer::WALK,
            StateTag::Hurt => wanderer::HURT,
            StateTag::Die => wanderer::DIE,
            _ => wanderer::IDLE,
        },
        ActorKind::Lancer => match state {
            StateTag::Walk => lancer::WALK,
            StateTag::Jump => lancer::JUMP,
            StateTag::Fall => lancer::FALL,
            StateTag::Attack => lancer::ATTACK,
            StateTag::Hurt => lancer::HURT,
            StateTag::Die => lancer::DIE,
            _ => lancer::IDLE,
        },
        ActorKind::Boss => match state {
            StateTag::Walk => boss::WALK,
            StateTag::Attack => boss::ATTACK,
            StateTag::Cast => boss::CAST,
            StateTag::Hurt => boss::HURT,
            StateTag::Die => boss::DIE,
            _ => boss::IDLE,
        },
    }
}
