//! Tracked entities and the temperature calculus.
//!
//! `InodeItem` and `RangeItem` are always reached through an `Arc`; the
//! index owns one clone while linked, the heat map holds only a `Weak`
//! back-link so it never keeps a node alive on its own (the realization of
//! the "index validated under the map lock" design note — see `DESIGN.md`).

pub mod freq;
pub mod heat_report;
pub mod inode_item;
pub mod range_item;
pub mod size_account;

pub use freq::{temperature, FreqSample};
pub use heat_report::HeatReport;
pub use inode_item::InodeItem;
pub use range_item::RangeItem;
pub use size_account::SizeAccount;

use std::sync::{Mutex, Weak};

/// A tracked entity's current slot in a [`crate::heatmap::HeatMap`].
///
/// `None` means the item is not currently linked into any bucket (freshly
/// constructed, or already unlinked). The heat map only ever stores a
/// `Weak` reference alongside this index, so an item that has been dropped
/// simply fails to upgrade rather than leaving a dangling pointer.
#[derive(Debug, Default)]
pub struct HeatLink(pub(crate) Mutex<Option<usize>>);

impl HeatLink {
    pub fn new() -> Self {
        Self(Mutex::new(None))
    }
}

/// Shared behaviour every heat-map-tracked entity exposes.
pub trait Tracked: Send + Sync {
    fn freq(&self) -> &FreqSample;
    fn heat_link(&self) -> &HeatLink;
}

/// A non-owning handle a heat-map bucket keeps on a tracked entity.
pub type BackLink<T> = Weak<T>;
