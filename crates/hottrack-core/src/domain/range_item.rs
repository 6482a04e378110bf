//! A fixed-width sub-file range and its access frequency.

use std::sync::Arc;

use super::{FreqSample, HeatLink, SizeAccount, Tracked};

/// One `2^range_bits`-byte range of a tracked file.
pub struct RangeItem {
    pub file_id: u64,
    pub start: u64,
    pub len: u64,
    freq: FreqSample,
    heat_link: HeatLink,
    size_account: Arc<SizeAccount>,
}

impl RangeItem {
    pub fn new(file_id: u64, start: u64, len: u64, size_account: Arc<SizeAccount>) -> Self {
        Self {
            file_id,
            start,
            len,
            freq: FreqSample::new(),
            heat_link: HeatLink::new(),
            size_account,
        }
    }
}

impl Tracked for RangeItem {
    fn freq(&self) -> &FreqSample {
        &self.freq
    }

    fn heat_link(&self) -> &HeatLink {
        &self.heat_link
    }
}

impl Drop for RangeItem {
    fn drop(&mut self) {
        self.size_account.record_free(std::mem::size_of::<Self>());
    }
}
