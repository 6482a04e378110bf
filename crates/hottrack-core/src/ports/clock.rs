//! Time source abstraction so aging can be tested deterministically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

/// A monotonic-enough nanosecond clock. The engine never needs wall-clock
/// semantics, only a strictly non-decreasing counter to compute deltas.
pub trait Clock: Send + Sync {
    fn now_ns(&self) -> u64;
}

/// Production adapter backed by `SystemTime`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ns(&self) -> u64 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}

/// Deterministic clock for tests: starts at 0, advances only when told to.
#[derive(Debug, Default)]
pub struct FakeClock {
    now: AtomicU64,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, nanos: u64) {
        self.now.fetch_add(nanos, Ordering::SeqCst);
    }

    pub fn set(&self, nanos: u64) {
        self.now.store(nanos, Ordering::SeqCst);
    }
}

impl Clock for FakeClock {
    fn now_ns(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
