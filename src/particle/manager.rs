//! Particle manager
//!
//! Owns every live particle. Each frame the host calls [`ParticleManager::update`]
//! and then [`ParticleManager::draw`]:
//! 1. Every live particle advances by the ticks elapsed since the last update
//! 2. Destroyed particles are swept
//! 3. Particles spawned since the last merge join the live set, untouched
//!    until the next update
//!
//! Drawing walks the live set in insertion order, so later effects draw over
//! earlier ones.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::registry::{ParticleRegistry, ParticleType};
use super::{Particle, SpawnContext};
use crate::clock::{Clock, SystemClock};
use crate::consts::CULL_MARGIN;
use crate::error::{ParticleError, Result};
use crate::renderer::{Renderer, Viewport};
use crate::settings::Settings;
use crate::Position;

pub struct ParticleManager {
    particles: Vec<Box<dyn Particle>>,
    new_particles: Vec<Box<dyn Particle>>,
    registry: ParticleRegistry,
    viewport: Viewport,
    clock: Box<dyn Clock>,
    last_ticks: u64,
    rng: Pcg32,
    low_detail: bool,
    max_particles: usize,
}

impl ParticleManager {
    pub fn new(registry: ParticleRegistry, clock: Box<dyn Clock>, seed: u64) -> Self {
        let last_ticks = clock.ticks();
        Self {
            particles: Vec::new(),
            new_particles: Vec::new(),
            registry,
            viewport: Viewport::default(),
            clock,
            last_ticks,
            rng: Pcg32::seed_from_u64(seed),
            low_detail: false,
            max_particles: usize::MAX,
        }
    }

    /// Manager on the wall clock
    pub fn with_system_clock(registry: ParticleRegistry, seed: u64) -> Self {
        Self::new(registry, Box::new(SystemClock::new()), seed)
    }

    /// Manager configured from quality settings
    pub fn from_settings(
        registry: ParticleRegistry,
        clock: Box<dyn Clock>,
        settings: &Settings,
    ) -> Self {
        let mut manager = Self::new(registry, clock, settings.seed);
        manager.set_low_detail(settings.low_detail());
        manager.set_max_particles(settings.max_particles());
        manager
    }

    /// Queue a constructed particle; it goes live at the next update
    pub fn add(&mut self, particle: Box<dyn Particle>) {
        self.new_particles.push(particle);
    }

    /// Construct a registered kind at `pos` and queue it
    pub fn add_type(&mut self, ty: ParticleType, pos: Position) -> Result<()> {
        match self.registry.create(ty, pos, &mut self.rng) {
            Ok(particle) => {
                self.new_particles.push(particle);
                Ok(())
            }
            Err(e) => {
                log::warn!("Rejected particle add at ({}, {}): {}", pos.x, pos.y, e);
                Err(e)
            }
        }
    }

    /// Construct a kind by name (e.g. "explosion") at `pos` and queue it
    pub fn add_named(&mut self, name: &str, pos: Position) -> Result<()> {
        let ty = self.get_type(name);
        if ty.is_none() {
            log::warn!("Unknown particle type '{}'", name);
            return Err(ParticleError::UnknownName(name.to_string()));
        }
        self.add_type(ty, pos)
    }

    /// Advance by the clock time elapsed since the previous update
    pub fn update(&mut self) {
        let now = self.clock.ticks();
        let elapsed = now.saturating_sub(self.last_ticks);
        self.last_ticks = now;
        self.update_by(u32::try_from(elapsed).unwrap_or(u32::MAX));
    }

    /// Advance by an explicit tick count (simulation-clock hosts)
    pub fn update_by(&mut self, ticks: u32) {
        let Self {
            particles,
            new_particles,
            registry,
            rng,
            low_detail,
            max_particles,
            ..
        } = self;

        {
            let mut ctx = SpawnContext::new(new_particles, registry, rng, *low_detail);
            for particle in particles.iter_mut() {
                particle.update(ticks, &mut ctx);
            }
        }

        let before = particles.len();
        particles.retain(|p| !p.is_destroyed());
        let swept = before - particles.len();

        new_particles.retain(|p| !p.is_destroyed());
        let room = max_particles.saturating_sub(particles.len());
        if new_particles.len() > room {
            log::debug!(
                "Particle cap {} reached, dropping {} new particles",
                max_particles,
                new_particles.len() - room
            );
            new_particles.truncate(room);
        }
        let merged = new_particles.len();
        particles.append(new_particles);

        if swept > 0 || merged > 0 {
            log::debug!(
                "Particles: {} live (+{} merged, -{} swept)",
                particles.len(),
                merged,
                swept
            );
        }
    }

    /// Draw every live particle through `renderer`, binding `vp` for
    /// screen-position lookups
    pub fn draw(&mut self, vp: &Viewport, renderer: &mut dyn Renderer) {
        self.viewport = *vp;
        for particle in &self.particles {
            if self.low_detail && particle.kind().is_detail() {
                continue;
            }
            let screen = self.get_screen_pos(particle.position());
            if !vp.contains(screen, CULL_MARGIN) {
                continue;
            }
            particle.draw(renderer, screen);
        }
    }

    /// Release every live and pending particle
    pub fn clear(&mut self) {
        let dropped = self.particles.len() + self.new_particles.len();
        self.particles.clear();
        self.new_particles.clear();
        log::debug!("Cleared {} particles", dropped);
    }

    /// World to screen position through the bound viewport
    pub fn get_screen_pos(&self, pos: Position) -> Position {
        self.viewport.map_to_screen(pos)
    }

    pub fn get_type(&self, name: &str) -> ParticleType {
        self.registry.get_type(name)
    }

    pub fn set_low_detail(&mut self, low_detail: bool) {
        self.low_detail = low_detail;
    }

    pub fn low_detail(&self) -> bool {
        self.low_detail
    }

    /// Cap on live particles; spawns beyond it are dropped at merge
    pub fn set_max_particles(&mut self, max: usize) {
        self.max_particles = max;
    }

    /// Bind a viewport without drawing
    pub fn set_viewport(&mut self, vp: Viewport) {
        self.viewport = vp;
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Live particle count
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Particles waiting for the next merge
    pub fn pending_len(&self) -> usize {
        self.new_particles.len()
    }

    /// Live particles in draw order
    pub fn particles(&self) -> impl Iterator<Item = &(dyn Particle + 'static)> {
        self.particles.iter().map(|p| p.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use glam::Vec2;
    use proptest::prelude::*;

    use super::*;
    use crate::clock::ManualClock;
    use crate::particle::{ParticleBase, ParticleKind};
    use crate::renderer::SpriteBatch;
    use crate::settings::QualityPreset;
    use crate::tuning::ParticleTuning;

    fn manager() -> (ParticleManager, ManualClock) {
        let clock = ManualClock::new();
        let registry = ParticleRegistry::with_defaults(&ParticleTuning::default()).unwrap();
        (
            ParticleManager::new(registry, Box::new(clock.clone()), 12345),
            clock,
        )
    }

    fn count_kind(manager: &ParticleManager, kind: ParticleKind) -> usize {
        manager.particles().filter(|p| p.kind() == kind).count()
    }

    /// Test particle that counts its updates and can spawn a child
    struct Counter {
        base: ParticleBase,
        updates: Rc<Cell<u32>>,
        spawn_child: Option<Rc<Cell<u32>>>,
        die_after: Option<u32>,
    }

    impl Counter {
        fn new(updates: Rc<Cell<u32>>) -> Self {
            Self {
                base: ParticleBase::new(Vec2::new(50.0, 50.0)),
                updates,
                spawn_child: None,
                die_after: None,
            }
        }
    }

    impl Particle for Counter {
        fn kind(&self) -> ParticleKind {
            ParticleKind::Static
        }

        fn base(&self) -> &ParticleBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut ParticleBase {
            &mut self.base
        }

        fn advance(&mut self, _ticks: u32, ctx: &mut SpawnContext<'_>) {
            self.updates.set(self.updates.get() + 1);
            if let Some(counter) = self.spawn_child.take() {
                ctx.spawn(Box::new(Counter::new(counter)));
            }
            if let Some(n) = self.die_after {
                if self.updates.get() >= n {
                    self.destroy();
                }
            }
        }

        fn render(&self, renderer: &mut dyn Renderer, screen: Position) {
            let g = crate::renderer::Graphic::new("counter.png", 2, 2, 1);
            renderer.draw_frame(&g, 0, screen.x as i32, screen.y as i32);
        }
    }

    #[test]
    fn test_add_goes_to_pending() {
        let (mut m, _) = manager();
        m.add_named("explosion", Vec2::new(10.0, 20.0)).unwrap();
        assert_eq!(m.len(), 0);
        assert_eq!(m.pending_len(), 1);

        m.update_by(0);
        assert_eq!(m.len(), 1);
        assert_eq!(m.pending_len(), 0);
    }

    #[test]
    fn test_unknown_type_reported() {
        let (mut m, _) = manager();
        let err = m.add_named("fireworks", Vec2::ZERO).unwrap_err();
        assert!(matches!(err, ParticleError::UnknownName(_)));

        let err = m.add_type(ParticleType::NONE, Vec2::ZERO).unwrap_err();
        assert!(matches!(err, ParticleError::UnknownType(_)));
        assert_eq!(m.pending_len(), 0);
        assert_eq!(m.get_type("fireworks"), ParticleType::NONE);
    }

    #[test]
    fn test_spawned_during_update_not_updated_same_tick() {
        let (mut m, _) = manager();
        let parent_updates = Rc::new(Cell::new(0));
        let child_updates = Rc::new(Cell::new(0));
        let mut parent = Counter::new(parent_updates.clone());
        parent.spawn_child = Some(child_updates.clone());
        m.add(Box::new(parent));

        // Merge parent
        m.update_by(10);
        assert_eq!(parent_updates.get(), 0);

        // Parent spawns child mid-update; child must wait
        m.update_by(10);
        assert_eq!(parent_updates.get(), 1);
        assert_eq!(child_updates.get(), 0);
        assert_eq!(m.len(), 2);

        m.update_by(10);
        assert_eq!(parent_updates.get(), 2);
        assert_eq!(child_updates.get(), 1);
    }

    #[test]
    fn test_update_sweeps_destroyed() {
        let (mut m, _) = manager();
        for n in 1..=3 {
            let mut counter = Counter::new(Rc::new(Cell::new(0)));
            counter.die_after = Some(n);
            m.add(Box::new(counter));
        }
        m.update_by(1);
        assert_eq!(m.len(), 3);

        m.update_by(1);
        assert_eq!(m.len(), 2);
        assert!(m.particles().all(|p| !p.is_destroyed()));

        m.update_by(1);
        m.update_by(1);
        assert!(m.is_empty());
    }

    #[test]
    fn test_explosion_lifecycle() {
        let (mut m, clock) = manager();
        m.add_named("explosion", Vec2::new(10.0, 20.0)).unwrap();

        m.update();
        assert_eq!(m.len(), 1);
        assert_eq!(count_kind(&m, ParticleKind::Explosion), 1);

        // Default flash: 16 frames at 40 ticks
        let mut frames = 0;
        while count_kind(&m, ParticleKind::Explosion) > 0 {
            clock.advance(40);
            m.update();
            frames += 1;
            assert!(frames <= 16, "explosion outlived its flash");
        }
        assert_eq!(frames, 16);
    }

    #[test]
    fn test_explosion_throws_debris() {
        let (mut m, _) = manager();
        m.add_named("explosion", Vec2::new(300.0, 300.0)).unwrap();
        m.update_by(0);
        m.update_by(16);
        assert_eq!(count_kind(&m, ParticleKind::Chunk), 8);
    }

    #[test]
    fn test_debris_survives_update_without_elapsed_time() {
        let (mut m, clock) = manager();
        m.add_named("explosion", Vec2::new(300.0, 300.0)).unwrap();
        m.update();
        clock.advance(16);
        m.update();
        assert_eq!(count_kind(&m, ParticleKind::Chunk), 8);

        m.update();
        assert_eq!(count_kind(&m, ParticleKind::Chunk), 8);
    }

    #[test]
    fn test_everything_eventually_expires() {
        let (mut m, _) = manager();
        m.add_named("explosion", Vec2::new(300.0, 300.0)).unwrap();
        let mut peak = 0;
        for _ in 0..400 {
            m.update_by(16);
            peak = peak.max(m.len());
        }
        assert!(peak > 8);
        assert!(m.is_empty());
        assert_eq!(m.pending_len(), 0);
    }

    #[test]
    fn test_clear_empties_both_sets() {
        let (mut m, _) = manager();
        m.add_named("explosion", Vec2::ZERO).unwrap();
        m.add_named("smoke", Vec2::ZERO).unwrap();
        m.update_by(0);
        m.add_named("chunk", Vec2::ZERO).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.pending_len(), 1);

        m.clear();
        assert_eq!(m.len(), 0);
        assert_eq!(m.pending_len(), 0);

        let mut batch = SpriteBatch::new();
        m.draw(&Viewport::default(), &mut batch);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_draw_uses_viewport_offset() {
        let (mut m, _) = manager();
        m.add(Box::new(Counter::new(Rc::new(Cell::new(0)))));
        m.update_by(0);

        let mut vp = Viewport::new(Vec2::new(8.0, 8.0), Vec2::new(200.0, 200.0));
        vp.scroll_to(Vec2::new(20.0, 30.0));
        let mut batch = SpriteBatch::new();
        m.draw(&vp, &mut batch);

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.instances()[0].position, [38.0, 28.0]);
        assert_eq!(m.get_screen_pos(Vec2::new(50.0, 50.0)), Vec2::new(38.0, 28.0));
    }

    #[test]
    fn test_draw_culls_offscreen() {
        let (mut m, _) = manager();
        m.add(Box::new(Counter::new(Rc::new(Cell::new(0)))));
        m.update_by(0);

        let mut vp = Viewport::new(Vec2::ZERO, Vec2::new(100.0, 100.0));
        vp.scroll_to(Vec2::new(1000.0, 1000.0));
        let mut batch = SpriteBatch::new();
        m.draw(&vp, &mut batch);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_draw_order_is_insertion_order() {
        let (mut m, _) = manager();
        m.add_named("smoke", Vec2::new(100.0, 100.0)).unwrap();
        m.add_named("explosion", Vec2::new(100.0, 100.0)).unwrap();
        m.update_by(0);

        let mut batch = SpriteBatch::new();
        m.draw(&Viewport::default(), &mut batch);
        assert_eq!(batch.len(), 2);
        let names: Vec<_> = batch
            .instances()
            .iter()
            .map(|i| batch.sheet_name(i.sheet).unwrap().to_string())
            .collect();
        assert!(names[0].contains("smoke"));
        assert!(names[1].contains("explosion"));
    }

    #[test]
    fn test_low_detail_skips_smoke_and_debris() {
        let (mut m, _) = manager();
        m.add_named("smoke", Vec2::new(100.0, 100.0)).unwrap();
        m.add_named("chunk", Vec2::new(100.0, 100.0)).unwrap();
        m.add_named("explosion", Vec2::new(100.0, 100.0)).unwrap();
        m.update_by(0);

        m.set_low_detail(true);
        assert!(m.low_detail());
        let mut batch = SpriteBatch::new();
        m.draw(&Viewport::default(), &mut batch);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.count_sheet(&ParticleTuning::default().explosion.graphic), 1);

        m.set_low_detail(false);
        batch.clear();
        m.draw(&Viewport::default(), &mut batch);
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn test_particle_cap() {
        let registry = ParticleRegistry::with_defaults(&ParticleTuning::default()).unwrap();
        let settings = Settings::from_preset(QualityPreset::Low);
        let clock = Box::new(ManualClock::new());
        let mut m = ParticleManager::from_settings(registry, clock, &settings);
        assert!(m.low_detail());

        for _ in 0..150 {
            m.add_named("smoke", Vec2::ZERO).unwrap();
        }
        m.update_by(0);
        assert_eq!(m.len(), 100);
        assert_eq!(m.pending_len(), 0);
    }

    #[test]
    fn test_clock_delta_drives_update() {
        let (mut m, clock) = manager();
        m.add_named("smoke", Vec2::new(100.0, 100.0)).unwrap();
        m.update();

        // Default rise rate 14 px/s
        clock.advance(500);
        m.update();
        let y = m.particles().next().unwrap().position().y;
        assert!((y - 93.0).abs() < 1e-3);

        // No time passed, no movement
        m.update();
        let y2 = m.particles().next().unwrap().position().y;
        assert_eq!(y, y2);
    }

    proptest! {
        #[test]
        fn prop_screen_pos_is_pure(
            x in -5000.0f32..5000.0,
            y in -5000.0f32..5000.0,
            sx in 0.0f32..4000.0,
            sy in 0.0f32..4000.0,
        ) {
            let (mut m, _) = manager();
            let mut vp = Viewport::default();
            vp.scroll_to(Vec2::new(sx, sy));
            m.set_viewport(vp);

            let a = m.get_screen_pos(Vec2::new(x, y));
            let b = m.get_screen_pos(Vec2::new(x, y));
            prop_assert_eq!(a, b);
            prop_assert_eq!(a, Vec2::new(x, y).floor() - Vec2::new(sx, sy));
        }

        #[test]
        fn prop_destroyed_particles_stay_inert(
            steps in proptest::collection::vec(0u32..200, 1..20),
        ) {
            let (mut m, _) = manager();
            m.add_named("smoke", Vec2::new(100.0, 100.0)).unwrap();
            m.add_named("chunk", Vec2::new(100.0, 100.0)).unwrap();
            m.add_named("explosion", Vec2::new(100.0, 100.0)).unwrap();
            for ticks in steps {
                m.update_by(ticks);
                prop_assert!(m.particles().all(|p| !p.is_destroyed()));
            }
        }
    }
}
