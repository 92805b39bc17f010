//! Particle effects
//!
//! Short-lived visual entities owned by a [`ParticleManager`]:
//! - Must only spawn other particles through a [`SpawnContext`]
//! - Never hold references to other particles
//! - Destruction is a one-way latch; the manager sweeps destroyed particles

pub mod animation;
pub mod chunk;
pub mod explosion;
pub mod manager;
pub mod registry;
pub mod smoke;
pub mod static_particle;

pub use animation::{Animation, GraphicAnimation, Playback};
pub use chunk::ChunkParticle;
pub use explosion::Explosion;
pub use manager::ParticleManager;
pub use registry::{ParticleFactory, ParticleRegistry, ParticleType};
pub use smoke::SmokeParticle;
pub use static_particle::StaticParticle;

use rand_pcg::Pcg32;

use crate::Position;
use crate::error::Result;
use crate::renderer::Renderer;

/// Broad particle categories, used by the low detail policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Static,
    Chunk,
    Smoke,
    Explosion,
}

impl ParticleKind {
    /// Kinds that are not drawn in low detail mode
    pub fn is_detail(&self) -> bool {
        matches!(self, ParticleKind::Chunk | ParticleKind::Smoke)
    }
}

/// State every particle carries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleBase {
    pub pos: Position,
    destroyed: bool,
}

impl ParticleBase {
    pub fn new(pos: Position) -> Self {
        Self {
            pos,
            destroyed: false,
        }
    }
}

/// A visual effect entity
///
/// Implementors provide `advance` and `render`; callers use `update` and
/// `draw`, which do nothing once the particle is destroyed.
pub trait Particle {
    fn kind(&self) -> ParticleKind;
    fn base(&self) -> &ParticleBase;
    fn base_mut(&mut self) -> &mut ParticleBase;

    /// Advance timers and physics by `ticks` milliseconds
    fn advance(&mut self, ticks: u32, ctx: &mut SpawnContext<'_>);

    /// Draw at an already transformed screen position
    fn render(&self, renderer: &mut dyn Renderer, screen: Position);

    fn position(&self) -> Position {
        self.base().pos
    }

    fn update(&mut self, ticks: u32, ctx: &mut SpawnContext<'_>) {
        if !self.is_destroyed() {
            self.advance(ticks, ctx);
        }
    }

    fn draw(&self, renderer: &mut dyn Renderer, screen: Position) {
        if !self.is_destroyed() {
            self.render(renderer, screen);
        }
    }

    fn destroy(&mut self) {
        self.base_mut().destroyed = true;
    }

    fn is_destroyed(&self) -> bool {
        self.base().destroyed
    }
}

/// Spawn access handed to particles during an update pass
///
/// New particles go to the manager's pending set, so the live set being
/// iterated is never touched.
pub struct SpawnContext<'a> {
    pending: &'a mut Vec<Box<dyn Particle>>,
    registry: &'a ParticleRegistry,
    rng: &'a mut Pcg32,
    low_detail: bool,
}

impl<'a> SpawnContext<'a> {
    pub fn new(
        pending: &'a mut Vec<Box<dyn Particle>>,
        registry: &'a ParticleRegistry,
        rng: &'a mut Pcg32,
        low_detail: bool,
    ) -> Self {
        Self {
            pending,
            registry,
            rng,
            low_detail,
        }
    }

    /// Queue an already constructed particle
    pub fn spawn(&mut self, particle: Box<dyn Particle>) {
        self.pending.push(particle);
    }

    /// Construct a registered kind and queue it
    pub fn spawn_type(&mut self, ty: ParticleType, pos: Position) -> Result<()> {
        let particle = self.registry.create(ty, pos, self.rng)?;
        self.pending.push(particle);
        Ok(())
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        self.rng
    }

    pub fn low_detail(&self) -> bool {
        self.low_detail
    }
}
