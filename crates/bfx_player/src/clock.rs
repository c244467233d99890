//! Time sources for driving playback.
//!
//! Players read wall-clock timestamps in milliseconds through [`Clock`] so the
//! host loop, tests and headless playback can all supply their own time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A monotonic millisecond time source.
pub trait Clock: Send + Sync {
    /// Milliseconds since an arbitrary, fixed origin.
    fn now_ms(&self) -> f64;
}

/// Real time, measured from when the clock was created.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give the
/// other to a player.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    /// Current time in milliseconds, stored as `f64` bits.
    now_bits: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock at the given time.
    pub fn starting_at(ms: f64) -> Self {
        let clock = Self::new();
        clock.set_ms(ms);
        clock
    }

    /// Jump to an absolute time.
    pub fn set_ms(&self, ms: f64) {
        self.now_bits.store(ms.to_bits(), Ordering::Relaxed);
    }

    /// Move forward by `delta` milliseconds.
    pub fn advance_ms(&self, delta: f64) {
        self.set_ms(self.now_ms() + delta);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        f64::from_bits(self.now_bits.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_starts_at_zero() {
        let clock = ManualClock::new();
        assert_eq!(clock.now_ms(), 0.0);
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::starting_at(100.0);
        let handle = clock.clone();

        handle.advance_ms(16.5);
        assert_eq!(clock.now_ms(), 116.5);

        clock.set_ms(5.0);
        assert_eq!(handle.now_ms(), 5.0);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
        assert!(a >= 0.0);
    }
}
