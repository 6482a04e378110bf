//! hottrack-core - in-memory hot/cold I/O access frequency tracking engine
//!
//! Tracks per-file and per-sub-file-range access frequency so a host
//! filesystem can classify data by temperature for tiering, migration, or
//! eviction decisions. This crate owns the data structures and algorithms;
//! it never talks to a real VFS, slab allocator, or kernel shrinker - those
//! are modeled as [`ports`] traits with library-supplied default adapters.
//!
//! # Layout
//!
//! - [`domain`] - the tracked entities (`InodeItem`, `RangeItem`,
//!   `FreqSample`) and the temperature calculus.
//! - [`index`] - the ordered, concurrency-safe map backing the inode index
//!   and each inode's range index.
//! - [`heatmap`] - the coarse bucket index used to answer hottest/coldest-N
//!   queries and to drive eviction order.
//! - [`ports`] - traits standing in for external collaborators (clock,
//!   allocator, deferred reclamation, task scheduling, shrinker
//!   registration).
//! - [`root`] - [`root::HotRoot`], the per-filesystem owner of everything
//!   above, plus the lifecycle API (`enable`, `disable`, `on_unlink`).
//! - [`ingress`] - the `record_access` fast path invoked from I/O hooks.
//! - [`aging`] - the periodic worker that recomputes temperature and
//!   rebuckets items.
//! - [`governor`] - the memory governor and shrinker eviction routine.

pub mod aging;
pub mod config;
pub mod domain;
pub mod error;
pub mod governor;
pub mod heatmap;
pub mod index;
pub mod ingress;
pub mod ports;
pub mod root;

pub use config::HotTrackConfig;
pub use error::HotTrackError;
pub use ingress::record_access;
pub use root::{disable, enable, enable_with, on_unlink, HotRoot, HotTrackHandle};
