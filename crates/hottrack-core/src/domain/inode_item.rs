//! A tracked file and its sub-file range index.

use std::sync::Arc;

use super::{FreqSample, HeatLink, RangeItem, SizeAccount, Tracked};
use crate::index::OrderedIndex;

/// A tracked file. Owns its own range index; dropping an `InodeItem` drops
/// every `RangeItem` it still references, which is how range eviction
/// happens transitively once the owning inode is reclaimed (the design
/// note's chosen resolution — the evictor only ever walks the inode heat
/// map).
pub struct InodeItem {
    pub file_id: u64,
    freq: FreqSample,
    heat_link: HeatLink,
    pub ranges: OrderedIndex<u64, RangeItem>,
    size_account: Arc<SizeAccount>,
}

impl InodeItem {
    pub fn new(file_id: u64, size_account: Arc<SizeAccount>) -> Self {
        Self {
            file_id,
            freq: FreqSample::new(),
            heat_link: HeatLink::new(),
            ranges: OrderedIndex::new(size_account.clone()),
            size_account,
        }
    }
}

impl Tracked for InodeItem {
    fn freq(&self) -> &FreqSample {
        &self.freq
    }

    fn heat_link(&self) -> &HeatLink {
        &self.heat_link
    }
}

impl Drop for InodeItem {
    fn drop(&mut self) {
        self.size_account.record_free(std::mem::size_of::<Self>());
    }
}
