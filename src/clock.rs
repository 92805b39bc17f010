//! Tick sources
//!
//! The particle manager measures elapsed time in millisecond ticks through a
//! [`Clock`]. Hosts with a wall clock use [`SystemClock`]; simulations that
//! step time themselves (and tests) use [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A monotonic millisecond tick source
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn ticks(&self) -> u64;
}

/// Wall-clock ticks since construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn ticks(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Externally driven ticks
///
/// Clones share the same counter, so a host can keep one handle and give
/// another to the manager.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    /// Jump to an absolute tick value
    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn ticks(&self) -> u64 {
        self.now.get()
    }
}

/// Read the processor's time-stamp counter
///
/// Only useful for relative cost measurements on a single core. Targets
/// without a TSC fall back to monotonic nanoseconds since first use.
#[inline]
pub fn read_timestamp_counter() -> u64 {
    #[cfg(target_arch = "x86_64")]
    {
        // SAFETY: rdtsc has no preconditions on x86_64
        unsafe { core::arch::x86_64::_rdtsc() }
    }
    #[cfg(target_arch = "x86")]
    {
        // SAFETY: every x86 target Rust supports has rdtsc
        unsafe { core::arch::x86::_rdtsc() }
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "x86")))]
    {
        static ORIGIN: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
        ORIGIN.get_or_init(Instant::now).elapsed().as_nanos() as u64
    }
}
