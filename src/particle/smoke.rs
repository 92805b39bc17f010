//! Rising smoke puff

use super::animation::{Animation, GraphicAnimation};
use super::{Particle, ParticleBase, ParticleKind, SpawnContext};
use crate::renderer::Renderer;
use crate::{Position, ticks_to_secs};

/// A puff that drifts upward while its animation plays once
pub struct SmokeParticle {
    base: ParticleBase,
    puff: GraphicAnimation,
    /// Pixels per second, upward
    rise_rate: f32,
}

impl SmokeParticle {
    pub fn new(pos: Position, puff: GraphicAnimation, rise_rate: f32) -> Self {
        Self {
            base: ParticleBase::new(pos),
            puff,
            rise_rate,
        }
    }

    pub fn frame(&self) -> usize {
        self.puff.frame()
    }
}

impl Particle for SmokeParticle {
    fn kind(&self) -> ParticleKind {
        ParticleKind::Smoke
    }

    fn base(&self) -> &ParticleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ParticleBase {
        &mut self.base
    }

    fn advance(&mut self, ticks: u32, _ctx: &mut SpawnContext<'_>) {
        self.puff.update(ticks);
        // Screen y grows downward
        self.base.pos.y -= self.rise_rate * ticks_to_secs(ticks);
        if self.puff.is_finished() {
            self.destroy();
        }
    }

    fn render(&self, renderer: &mut dyn Renderer, screen: Position) {
        self.puff.draw(renderer, screen.x as i32, screen.y as i32);
    }
}
