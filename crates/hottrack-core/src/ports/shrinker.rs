//! Stand-in for registering with the kernel's `register_shrinker`.
//!
//! A real shrinker is invoked by the kernel under memory pressure with a
//! `count_objects`/`scan_objects` pair; this port gives a userspace harness
//! (or `hottrack-daemon`) the same two calls to drive manually or from its
//! own memory-pressure signal.

use crate::governor::MemoryGovernor;
use std::sync::Arc;

/// Outcome of one `scan_objects` call — the "distinguished stop token"
/// `spec.md` §6/§7 calls for so a caller can tell "nothing left to free"
/// apart from "told to stop".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    Freed(u64),
    Stopped,
}

pub trait ShrinkerRegistry: Send + Sync {
    /// Approximate number of reclaimable objects, for the kernel's
    /// pressure heuristics (or a test assertion).
    fn count_objects(&self) -> u64;

    /// Free up to `target` objects. `avoid_fs_recursion` mirrors
    /// `SHRINK_STOP`-style reentrancy avoidance: when set, the call must
    /// not touch anything that could recurse back into the filesystem and
    /// should return `ScanOutcome::Stopped` immediately.
    fn scan_objects(&self, target: u64, avoid_fs_recursion: bool) -> ScanOutcome;
}

/// In-process registry a test or `hottrack-daemon` can call directly,
/// standing in for the kernel calling back into a registered shrinker.
pub struct InProcessShrinkerRegistry {
    governor: Arc<MemoryGovernor>,
}

impl InProcessShrinkerRegistry {
    pub fn new(governor: Arc<MemoryGovernor>) -> Self {
        Self { governor }
    }
}

impl ShrinkerRegistry for InProcessShrinkerRegistry {
    fn count_objects(&self) -> u64 {
        self.governor.reclaimable_objects()
    }

    fn scan_objects(&self, target: u64, avoid_fs_recursion: bool) -> ScanOutcome {
        if avoid_fs_recursion {
            return ScanOutcome::Stopped;
        }
        ScanOutcome::Freed(self.governor.evict_count(target))
    }
}
