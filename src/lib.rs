//! Bos Particles - particle effects for a real-time strategy engine
//!
//! Core modules:
//! - `particle`: Particle kinds, animations, type registry and the manager
//! - `renderer`: Draw contract, viewport transform and sprite batching
//! - `clock`: Tick sources and the CPU time-stamp counter
//! - `action`: Unit death handling (the main particle trigger outside combat)
//! - `settings`: Quality preferences (low detail, particle caps)
//! - `tuning`: Data-driven effect parameters

pub mod action;
pub mod clock;
pub mod error;
pub mod particle;
pub mod renderer;
pub mod settings;
pub mod tuning;

pub use error::{ParticleError, Result};
pub use particle::{ParticleManager, ParticleRegistry, ParticleType};
pub use renderer::{Renderer, SpriteBatch, Viewport};
pub use settings::{QualityPreset, Settings};
pub use tuning::ParticleTuning;

use glam::Vec2;

/// A world-space position in map pixels
pub type Position = Vec2;

/// Effect configuration constants
///
/// Ticks are milliseconds throughout the particle code.
pub mod consts {
    /// Ticks per second
    pub const TICKS_PER_SECOND: f32 = 1000.0;

    /// Debris gravity (pixels/s²)
    pub const CHUNK_GRAVITY: f32 = 32.0 * 12.0;
    /// Debris launch speed range (pixels/s)
    pub const CHUNK_MIN_VELOCITY: u32 = 80;
    pub const CHUNK_MAX_VELOCITY: u32 = 400;
    /// Debris launch elevation range (degrees above the ground plane)
    pub const CHUNK_MIN_TRAJECTORY_DEG: u32 = 77;
    pub const CHUNK_MAX_TRAJECTORY_DEG: u32 = 85;
    /// Debris lifetime range (ticks)
    pub const CHUNK_MIN_LIFETIME: u32 = 1200;
    pub const CHUNK_MAX_LIFETIME: u32 = 2400;
    /// Interval between smoke puffs trailing debris (ticks)
    pub const CHUNK_MIN_SMOKE_TICKS: u32 = 80;
    pub const CHUNK_MAX_SMOKE_TICKS: u32 = 150;

    /// Smoke rise speed (pixels/s)
    pub const SMOKE_RISE_RATE: f32 = 14.0;

    /// Debris chunks thrown by one explosion
    pub const EXPLOSION_CHUNKS: u32 = 8;

    /// Off-screen slack before a particle is culled (pixels)
    pub const CULL_MARGIN: f32 = 64.0;
}

/// Unit vector on the ground plane for a heading in radians
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Convert a tick count to seconds
#[inline]
pub fn ticks_to_secs(ticks: u32) -> f32 {
    ticks as f32 / consts::TICKS_PER_SECOND
}
