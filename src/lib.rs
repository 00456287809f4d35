//! OLED Asteroids - fixed-timestep arcade core for a 128x64 monochrome panel
//!
//! Core modules:
//! - `sim`: Game simulation (pools, physics, collisions, game flow)
//! - `audio`: Monophonic tone-channel cue sequencer
//! - `renderer`: Draw-surface adapter fed by simulation snapshots
//! - `platform`: Clock abstraction and the cabinet loop
//! - `persistence`: Integer key-value stores for the high score
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use tuning::{ControlScheme, SlowFragment, Tuning, Variant};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Display dimensions (logical pixels)
    pub const SCREEN_WIDTH: f32 = 128.0;
    pub const SCREEN_HEIGHT: f32 = 64.0;

    /// Pool capacities - hard ceilings, spawns beyond these are dropped
    pub const MAX_BULLETS: usize = 5;
    pub const MAX_ASTEROIDS: usize = 10;

    pub const STARTING_LIVES: u8 = 3;

    /// Collision radii
    pub const SHIP_COLLISION_RADIUS: f32 = 4.0;
    pub const BULLET_COLLISION_RADIUS: f32 = 1.0;

    /// Bullets leave the ship this far past its collision radius
    pub const BULLET_NOSE_OFFSET: f32 = 2.0;

    /// Points per asteroid size class
    pub const SCORE_LARGE: u32 = 20;
    pub const SCORE_MEDIUM: u32 = 50;
    pub const SCORE_SMALL: u32 = 100;

    /// One extra asteroid per wave for every this many points
    pub const SCORE_PER_EXTRA_ASTEROID: u32 = 500;

    /// Length of the "Wave Cleared" stall (ms)
    pub const WAVE_CLEARED_PAUSE_MS: u64 = 1500;

    /// Invincible ship blinks with this half-period (ms)
    pub const BLINK_PERIOD_MS: u64 = 200;
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn wrap_heading(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Unit vector pointing along `heading`
#[inline]
pub fn heading_vector(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin())
}

/// Rotate a point about the origin
#[inline]
pub fn rotate_point(point: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(point.x * cos - point.y * sin, point.x * sin + point.y * cos)
}
