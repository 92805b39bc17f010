//! Ballistic debris trailing smoke
//!
//! A chunk is thrown from its spawn point in a random ground direction at a
//! steep random elevation. Ground position moves at constant speed; height
//! follows `v·sin(a)·t - g·t²/2`. The chunk is destroyed when it lands or
//! outlives its lifetime, whichever comes first.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::animation::{Animation, GraphicAnimation};
use super::registry::ParticleType;
use super::{Particle, ParticleBase, ParticleKind, SpawnContext};
use crate::renderer::Renderer;
use crate::tuning::ChunkParams;
use crate::{Position, direction_from_angle, ticks_to_secs};

/// Uniform pick from an inclusive range that tolerates `max <= min`
fn pick(rng: &mut Pcg32, min: u32, max: u32) -> u32 {
    if max <= min {
        min
    } else {
        rng.random_range(min..=max)
    }
}

pub struct ChunkParticle {
    base: ParticleBase,
    initial_pos: Position,
    /// Launch speed (pixels/s)
    initial_velocity: u32,
    /// Elevation above the ground plane (radians)
    trajectory_angle: f32,
    /// Countdown to the next smoke puff (ticks)
    next_smoke_ticks: i64,
    lifetime: u32,
    age: u32,
    height: f32,
    direction: Vec2,
    gravity: f32,
    min_smoke_ticks: u32,
    max_smoke_ticks: u32,
    smoke_type: ParticleType,
    debris: GraphicAnimation,
}

impl ChunkParticle {
    /// `smoke_type` may be `ParticleType::NONE` for debris without a trail
    pub fn new(
        pos: Position,
        debris: GraphicAnimation,
        smoke_type: ParticleType,
        params: &ChunkParams,
        rng: &mut Pcg32,
    ) -> Self {
        let heading = rng.random_range(0.0..TAU);
        let initial_velocity = pick(rng, params.min_velocity, params.max_velocity);
        let trajectory_deg = pick(rng, params.min_trajectory_deg, params.max_trajectory_deg);
        let lifetime = pick(rng, params.min_lifetime, params.max_lifetime);
        let smoke_ticks = pick(rng, params.min_smoke_ticks, params.max_smoke_ticks);

        Self {
            base: ParticleBase::new(pos),
            initial_pos: pos,
            initial_velocity,
            trajectory_angle: (trajectory_deg as f32).to_radians(),
            next_smoke_ticks: i64::from(smoke_ticks),
            lifetime,
            age: 0,
            height: 0.0,
            direction: direction_from_angle(heading),
            gravity: params.gravity,
            min_smoke_ticks: params.min_smoke_ticks,
            max_smoke_ticks: params.max_smoke_ticks,
            smoke_type,
            debris,
        }
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn lifetime(&self) -> u32 {
        self.lifetime
    }

    pub fn initial_velocity(&self) -> u32 {
        self.initial_velocity
    }

    /// Ticks until the arc returns to the ground
    pub fn flight_ticks(&self) -> u32 {
        let vertical = self.initial_velocity as f32 * self.trajectory_angle.sin();
        (2.0 * vertical / self.gravity * crate::consts::TICKS_PER_SECOND).ceil() as u32
    }

    fn emit_smoke(&mut self, ctx: &mut SpawnContext<'_>) {
        if self.smoke_type.is_none() || ctx.low_detail() {
            return;
        }
        let at = self.base.pos - Vec2::new(0.0, self.height);
        if let Err(e) = ctx.spawn_type(self.smoke_type, at) {
            log::warn!("Chunk smoke spawn failed: {}", e);
        }
    }
}

impl Particle for ChunkParticle {
    fn kind(&self) -> ParticleKind {
        ParticleKind::Chunk
    }

    fn base(&self) -> &ParticleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ParticleBase {
        &mut self.base
    }

    fn advance(&mut self, ticks: u32, ctx: &mut SpawnContext<'_>) {
        // Still on the launch point; nothing to integrate
        if ticks == 0 {
            return;
        }
        self.age = self.age.saturating_add(ticks);
        if self.age >= self.lifetime {
            self.destroy();
            return;
        }
        self.debris.update(ticks);

        let t = ticks_to_secs(self.age);
        let v = self.initial_velocity as f32;
        self.height = v * self.trajectory_angle.sin() * t - 0.5 * self.gravity * t * t;
        if self.height <= 0.0 {
            self.height = 0.0;
            self.destroy();
            return;
        }

        let distance = v * self.trajectory_angle.cos() * t;
        self.base.pos = self.initial_pos + self.direction * distance;

        self.next_smoke_ticks -= i64::from(ticks);
        if self.next_smoke_ticks <= 0 {
            self.emit_smoke(ctx);
            let interval = pick(ctx.rng(), self.min_smoke_ticks, self.max_smoke_ticks);
            self.next_smoke_ticks = (self.next_smoke_ticks + i64::from(interval)).max(1);
        }
    }

    fn render(&self, renderer: &mut dyn Renderer, screen: Position) {
        self.debris
            .draw(renderer, screen.x as i32, (screen.y - self.height) as i32);
    }
}
