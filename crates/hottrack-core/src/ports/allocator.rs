//! Stand-in for the kernel slab allocator `spec.md` models as an external
//! collaborator.
//!
//! Rust's global allocator already gives cheap typed alloc/free (`Arc::new`
//! / `Drop`), and safe Rust has no fallible-allocation story on stable
//! (`Box::try_new` aside) — an allocator failure there aborts the process,
//! which is the ecosystem norm, not a `Result` to propagate. What *is*
//! meaningful to model as fallible is a configured memory budget: this
//! trait lets `record_access` ask "is there room for one more entry"
//! before it constructs one, which is where `spec.md` §7's "record_access
//! degrades gracefully under allocation failure" actually has teeth in a
//! Rust rewrite.

use crate::error::HotTrackError;

pub trait SlabAllocator: Send + Sync {
    /// Reserve capacity for `additional_bytes` more tracked state. Returns
    /// `Err(HotTrackError::OutOfMemory)` if the configured budget (if any)
    /// would be exceeded.
    fn try_reserve(&self, additional_bytes: u64) -> Result<(), HotTrackError>;
}

/// Unbounded adapter: every reservation succeeds, matching a host with no
/// configured memory ceiling (the engine still honors
/// `hot_mem_high_thresh_mb` separately via the memory governor).
#[derive(Debug, Default)]
pub struct StdAllocator;

impl SlabAllocator for StdAllocator {
    fn try_reserve(&self, _additional_bytes: u64) -> Result<(), HotTrackError> {
        Ok(())
    }
}
