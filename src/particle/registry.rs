//! Particle type registry
//!
//! Maps effect names used by game data ("explosion", "smoke", ...) to type
//! ids and the factories that build them.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use rand_pcg::Pcg32;

use super::animation::{GraphicAnimation, Playback};
use super::{ChunkParticle, Explosion, Particle, SmokeParticle};
use crate::Position;
use crate::error::{ParticleError, Result};
use crate::tuning::ParticleTuning;

/// Builds a particle of one registered kind
pub type ParticleFactory = Box<dyn Fn(Position, &mut Pcg32) -> Result<Box<dyn Particle>>>;

/// Registered particle kind id; `NONE` never resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ParticleType(u16);

impl ParticleType {
    pub const NONE: Self = Self(0);

    pub fn id(&self) -> u16 {
        self.0
    }

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

struct RegistryEntry {
    name: String,
    factory: ParticleFactory,
}

#[derive(Default)]
pub struct ParticleRegistry {
    entries: Vec<RegistryEntry>,
    by_name: HashMap<String, ParticleType>,
}

impl fmt::Debug for ParticleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| &e.name))
            .finish()
    }
}

impl ParticleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in smoke, chunk and explosion kinds
    pub fn with_defaults(tuning: &ParticleTuning) -> Result<Self> {
        tuning.validate()?;
        let mut registry = Self::new();

        let smoke_sheet = Rc::new(tuning.smoke.to_graphic());
        let smoke_tpf = tuning.smoke.ticks_per_frame;
        let rise_rate = tuning.smoke_rise_rate;
        let smoke = registry.register("smoke", move |pos, _rng| {
            let puff = GraphicAnimation::new(smoke_sheet.clone(), smoke_tpf, Playback::Once)?;
            let particle: Box<dyn Particle> = Box::new(SmokeParticle::new(pos, puff, rise_rate));
            Ok(particle)
        })?;

        let chunk_sheet = Rc::new(tuning.chunk.to_graphic());
        let chunk_tpf = tuning.chunk.ticks_per_frame;
        let physics = tuning.chunk_physics.clone();
        let chunk = registry.register("chunk", move |pos, rng| {
            let debris = GraphicAnimation::new(chunk_sheet.clone(), chunk_tpf, Playback::Loop)?;
            let particle: Box<dyn Particle> =
                Box::new(ChunkParticle::new(pos, debris, smoke, &physics, rng));
            Ok(particle)
        })?;

        let flash_sheet = Rc::new(tuning.explosion.to_graphic());
        let flash_tpf = tuning.explosion.ticks_per_frame;
        let chunk_count = tuning.explosion_chunks;
        registry.register("explosion", move |pos, _rng| {
            let flash = GraphicAnimation::new(flash_sheet.clone(), flash_tpf, Playback::Once)?;
            let particle: Box<dyn Particle> =
                Box::new(Explosion::new(pos, flash, chunk, chunk_count));
            Ok(particle)
        })?;

        log::info!("Registered particle types: {:?}", registry);
        Ok(registry)
    }

    /// Add a named kind; names are unique
    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<ParticleType>
    where
        F: Fn(Position, &mut Pcg32) -> Result<Box<dyn Particle>> + 'static,
    {
        if self.by_name.contains_key(name) {
            return Err(ParticleError::DuplicateName(name.to_string()));
        }
        // Ids start at 1; 0 is NONE
        let id = u16::try_from(self.entries.len() + 1)
            .map_err(|_| ParticleError::RegistryFull(self.entries.len()))?;
        let ty = ParticleType(id);
        self.entries.push(RegistryEntry {
            name: name.to_string(),
            factory: Box::new(factory),
        });
        self.by_name.insert(name.to_string(), ty);
        Ok(ty)
    }

    /// Resolve a name; `ParticleType::NONE` if unknown
    pub fn get_type(&self, name: &str) -> ParticleType {
        self.by_name.get(name).copied().unwrap_or(ParticleType::NONE)
    }

    pub fn name_of(&self, ty: ParticleType) -> Option<&str> {
        self.entry(ty).map(|e| e.name.as_str())
    }

    pub fn create(
        &self,
        ty: ParticleType,
        pos: Position,
        rng: &mut Pcg32,
    ) -> Result<Box<dyn Particle>> {
        let entry = self.entry(ty).ok_or(ParticleError::UnknownType(ty))?;
        (entry.factory)(pos, rng)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, ty: ParticleType) -> Option<&RegistryEntry> {
        if ty.is_none() {
            return None;
        }
        self.entries.get(ty.0 as usize - 1)
    }
}
