//! Explosion burst

use super::animation::{Animation, GraphicAnimation};
use super::registry::ParticleType;
use super::{Particle, ParticleBase, ParticleKind, SpawnContext};
use crate::Position;
use crate::renderer::Renderer;

/// A one-shot flash that throws debris on its first update
pub struct Explosion {
    base: ParticleBase,
    flash: GraphicAnimation,
    chunk_type: ParticleType,
    chunk_count: u32,
    burst_done: bool,
}

impl Explosion {
    /// `chunk_type` may be `ParticleType::NONE` for a flash without debris
    pub fn new(
        pos: Position,
        flash: GraphicAnimation,
        chunk_type: ParticleType,
        chunk_count: u32,
    ) -> Self {
        Self {
            base: ParticleBase::new(pos),
            flash,
            chunk_type,
            chunk_count,
            burst_done: false,
        }
    }

    fn burst(&mut self, ctx: &mut SpawnContext<'_>) {
        self.burst_done = true;
        if self.chunk_type.is_none() {
            return;
        }
        let count = if ctx.low_detail() {
            self.chunk_count / 2
        } else {
            self.chunk_count
        };
        for _ in 0..count {
            if let Err(e) = ctx.spawn_type(self.chunk_type, self.base.pos) {
                log::warn!("Explosion debris spawn failed: {}", e);
                break;
            }
        }
    }
}

impl Particle for Explosion {
    fn kind(&self) -> ParticleKind {
        ParticleKind::Explosion
    }

    fn base(&self) -> &ParticleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ParticleBase {
        &mut self.base
    }

    fn advance(&mut self, ticks: u32, ctx: &mut SpawnContext<'_>) {
        if !self.burst_done {
            self.burst(ctx);
        }
        self.flash.update(ticks);
        if self.flash.is_finished() {
            self.destroy();
        }
    }

    fn render(&self, renderer: &mut dyn Renderer, screen: Position) {
        self.flash.draw(renderer, screen.x as i32, screen.y as i32);
    }
}
