//! Traits standing in for the engine's external collaborators: the VFS
//! clock, the slab allocator, task scheduling, and kernel shrinker
//! registration. Each has one default adapter suitable for a
//! hosted/userspace harness; `hottrack-core` itself only depends on the
//! traits.
//!
//! There is no deferred-reclamation port: every handle into the index is an
//! `Arc`/`Weak` pair (see `heatmap::HeatMap`'s doc comment), so a reader
//! mid-traversal already keeps its own node alive for as long as it needs
//! to, and a dropped node's memory is reclaimed the moment the last `Arc`
//! goes away. A generation-counted grace period would only be buying back
//! something Rust's own reference counting already guarantees here.

pub mod allocator;
pub mod clock;
pub mod scheduler;
pub mod shrinker;

pub use allocator::{SlabAllocator, StdAllocator};
pub use clock::{Clock, FakeClock, SystemClock};
pub use scheduler::{TaskHandle, TaskScheduler, TokioScheduler};
pub use shrinker::{InProcessShrinkerRegistry, ScanOutcome, ShrinkerRegistry};
