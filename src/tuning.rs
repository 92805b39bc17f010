//! Data-driven effect parameters
//!
//! Sprite sheets and physics ranges for the built-in particle kinds. Every
//! field has a default, so a tuning file only needs the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::Result;
use crate::particle::animation::validate_layout;
use crate::renderer::Graphic;

/// Sprite sheet layout and playback speed for one animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSpec {
    pub graphic: String,
    pub frame_width: u32,
    pub frame_height: u32,
    pub frames: usize,
    pub ticks_per_frame: u32,
}

impl AnimationSpec {
    pub fn new(
        graphic: impl Into<String>,
        frame_width: u32,
        frame_height: u32,
        frames: usize,
        ticks_per_frame: u32,
    ) -> Self {
        Self {
            graphic: graphic.into(),
            frame_width,
            frame_height,
            frames,
            ticks_per_frame,
        }
    }

    /// Reject layouts no animation can play
    pub fn validate(&self) -> Result<()> {
        validate_layout(&self.to_graphic(), self.ticks_per_frame)
    }

    pub fn to_graphic(&self) -> Graphic {
        Graphic::new(
            self.graphic.clone(),
            self.frame_width,
            self.frame_height,
            self.frames,
        )
    }
}

/// Debris launch and lifetime ranges (inclusive)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkParams {
    pub gravity: f32,
    pub min_velocity: u32,
    pub max_velocity: u32,
    pub min_trajectory_deg: u32,
    pub max_trajectory_deg: u32,
    pub min_lifetime: u32,
    pub max_lifetime: u32,
    pub min_smoke_ticks: u32,
    pub max_smoke_ticks: u32,
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            gravity: CHUNK_GRAVITY,
            min_velocity: CHUNK_MIN_VELOCITY,
            max_velocity: CHUNK_MAX_VELOCITY,
            min_trajectory_deg: CHUNK_MIN_TRAJECTORY_DEG,
            max_trajectory_deg: CHUNK_MAX_TRAJECTORY_DEG,
            min_lifetime: CHUNK_MIN_LIFETIME,
            max_lifetime: CHUNK_MAX_LIFETIME,
            min_smoke_ticks: CHUNK_MIN_SMOKE_TICKS,
            max_smoke_ticks: CHUNK_MAX_SMOKE_TICKS,
        }
    }
}

/// Tuning for all built-in effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    /// Explosion flash
    pub explosion: AnimationSpec,
    /// Rising smoke puff
    pub smoke: AnimationSpec,
    /// Spinning debris
    pub chunk: AnimationSpec,
    pub chunk_physics: ChunkParams,
    /// Smoke rise speed (pixels/s)
    pub smoke_rise_rate: f32,
    /// Debris chunks per explosion at full detail
    pub explosion_chunks: u32,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            explosion: AnimationSpec::new("graphics/particle/explosion.png", 64, 64, 16, 40),
            smoke: AnimationSpec::new("graphics/particle/smokelight24.png", 24, 24, 11, 60),
            chunk: AnimationSpec::new("graphics/particle/chunk.png", 4, 4, 4, 50),
            chunk_physics: ChunkParams::default(),
            smoke_rise_rate: SMOKE_RISE_RATE,
            explosion_chunks: EXPLOSION_CHUNKS,
        }
    }
}

impl ParticleTuning {
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded particle tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<()> {
        self.explosion.validate()?;
        self.smoke.validate()?;
        self.chunk.validate()
    }
}
