pub const PLAYFIELD_WIDTH: f32 = 1920.0;
pub const PLAYFIELD_HEIGHT: f32 = 1080.0;
pub const GROUND_BAND_HEIGHT: f32 = 80.0;

pub const GRAVITY: f32 = 800.0;

pub const FALL_THROUGH_WINDOW: f32 = 0.5;
pub const FALL_THROUGH_KICK: f32 = 100.0;

/// Projectiles survive this far beyond the playfield edges before despawn.
pub const OFFSCREEN_MARGIN: f32 = 50.0;

pub fn ground_top() -> f32 {
    PLAYFIELD_HEIGHT - GROUND_BAND_HEIGHT
}
