//! Bos Particles demo
//!
//! Headless host loop: spawns explosions on a schedule under a scrolling
//! viewport and reports particle counts and per-frame cost.
//!
//! Usage: `bos-particles [settings.json] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bos Particles (native) starting...");

    if let Err(e) = demo::run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No host loop on the web
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use bos_particles::clock::{ManualClock, read_timestamp_counter};
    use bos_particles::{
        ParticleManager, ParticleRegistry, ParticleTuning, Result, Settings, SpriteBatch, Viewport,
    };

    /// Frames to simulate
    const FRAMES: u32 = 600;
    /// Frame step (ticks), ~60 Hz
    const FRAME_TICKS: u64 = 16;
    /// Frames between explosions
    const EXPLOSION_INTERVAL: u32 = 45;
    /// Map size the explosions land on (pixels)
    const MAP_SIZE: f32 = 2048.0;

    pub fn run() -> Result<()> {
        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::load_from(path),
            None => Settings::default(),
        };
        let tuning = match args.next() {
            Some(path) => ParticleTuning::load_from(path)?,
            None => ParticleTuning::default(),
        };
        log::info!(
            "Quality: {}, low detail: {}, cap: {}",
            settings.quality.as_str(),
            settings.low_detail(),
            settings.max_particles()
        );

        let registry = ParticleRegistry::with_defaults(&tuning)?;
        let clock = ManualClock::new();
        let mut particles =
            ParticleManager::from_settings(registry, Box::new(clock.clone()), &settings);

        let mut viewport = Viewport::new(Vec2::ZERO, Vec2::new(640.0, 480.0));
        let mut batch = SpriteBatch::new();
        let mut rng = Pcg32::seed_from_u64(settings.seed ^ 0xdead_beef);

        let mut peak = 0;
        let mut total_draws = 0;
        let mut total_cycles = 0u64;

        for frame in 0..FRAMES {
            // Slow diagonal pan across the map
            viewport.scroll_to(Vec2::splat(frame as f32 * 0.5));

            if frame % EXPLOSION_INTERVAL == 0 {
                let center = viewport.scroll + viewport.size / 2.0;
                let jitter = Vec2::new(
                    rng.random_range(-200.0..200.0),
                    rng.random_range(-150.0..150.0),
                );
                let at = (center + jitter).clamp(Vec2::ZERO, Vec2::splat(MAP_SIZE));
                particles.add_named("explosion", at)?;
            }

            let start = read_timestamp_counter();
            clock.advance(FRAME_TICKS);
            particles.update();
            batch.clear();
            particles.draw(&viewport, &mut batch);
            total_cycles += read_timestamp_counter().saturating_sub(start);

            peak = peak.max(particles.len());
            total_draws += batch.len();

            if frame % 60 == 0 {
                log::info!(
                    "frame {:4}: {:3} live, {:3} sprites ({} bytes)",
                    frame,
                    particles.len(),
                    batch.len(),
                    batch.as_bytes().len()
                );
            }
        }

        log::info!(
            "Done: peak {} particles, {} sprites drawn, {} cycles/frame",
            peak,
            total_draws,
            total_cycles / FRAMES as u64
        );
        println!("peak particles: {}", peak);
        println!("sprites drawn:  {}", total_draws);

        particles.clear();
        Ok(())
    }
}
