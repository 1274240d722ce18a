pub mod actors;
pub mod animation;
pub mod config;
pub mod constants;
pub mod engine;
pub mod geometry;
pub mod level;
pub mod physics;
pub mod projectile;
pub mod rng;
pub mod types;
