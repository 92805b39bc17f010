//! Fixed-position particle playing a single animation

use super::animation::Animation;
use super::{Particle, ParticleBase, ParticleKind, SpawnContext};
use crate::Position;
use crate::renderer::Renderer;

/// Plays one animation in place
///
/// A one-shot animation destroys the particle when it ends. A looping one
/// keeps it alive until whoever placed it calls `destroy`.
pub struct StaticParticle {
    base: ParticleBase,
    animation: Box<dyn Animation>,
}

impl StaticParticle {
    pub fn new(pos: Position, animation: Box<dyn Animation>) -> Self {
        Self {
            base: ParticleBase::new(pos),
            animation,
        }
    }
}

impl Particle for StaticParticle {
    fn kind(&self) -> ParticleKind {
        ParticleKind::Static
    }

    fn base(&self) -> &ParticleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ParticleBase {
        &mut self.base
    }

    fn advance(&mut self, ticks: u32, _ctx: &mut SpawnContext<'_>) {
        self.animation.update(ticks);
        if self.animation.is_finished() {
            self.destroy();
        }
    }

    fn render(&self, renderer: &mut dyn Renderer, screen: Position) {
        self.animation.draw(renderer, screen.x as i32, screen.y as i32);
    }
}
