//! Memory-pressure eviction: the high-watermark sweep run by the aging
//! worker and the on-demand scan the shrinker port drives.
//!
//! Range items are never evicted directly — per the chosen resolution of
//! the range-eviction design note, the evictor only ever walks the inode
//! heat map; a file's ranges are reclaimed transitively when the owning
//! `InodeItem` is dropped.

use std::sync::Arc;

use crate::domain::InodeItem;
use crate::root::HotRoot;

/// An item is safe to evict when the index is its only remaining owner.
/// `walk_ascending` hands us an `Arc` it just upgraded from a `Weak`, so
/// the baseline (nobody else holds it) strong count is 2: one for the
/// index's own clone, one for this temporary upgrade.
fn only_indexed(item: &Arc<InodeItem>) -> bool {
    Arc::strong_count(item) <= 2
}

pub struct MemoryGovernor {
    root: Arc<HotRoot>,
}

impl MemoryGovernor {
    pub fn new(root: Arc<HotRoot>) -> Self {
        Self { root }
    }

    pub fn reclaimable_objects(&self) -> u64 {
        self.root.inodes().len() as u64
    }

    /// Called every aging tick: if a high watermark is configured and
    /// exceeded, evict coldest inodes until back under it.
    pub fn high_watermark_sweep(&self) -> u64 {
        let config = self.root.config_snapshot();
        if config.hot_mem_high_thresh_mb == 0 {
            return 0;
        }
        let high = config.hot_mem_high_thresh_mb as u64 * 1024 * 1024;
        let current = self.root.size_account().bytes();
        if current <= high {
            return 0;
        }
        self.evict_bytes(current - high)
    }

    /// Evict coldest-first until at least `target_bytes` have been freed
    /// (by size-account accounting) or the heat map is exhausted.
    pub fn evict_bytes(&self, target_bytes: u64) -> u64 {
        let mut freed = 0u64;
        self.root.inode_heat().walk_ascending(|item| {
            if freed >= target_bytes {
                return false;
            }
            if only_indexed(item) && self.root.inodes().remove(&item.file_id).is_some() {
                freed += std::mem::size_of::<InodeItem>() as u64;
            }
            true
        });
        freed
    }

    /// Evict coldest-first until `target_count` objects have been freed;
    /// the shape `ShrinkerRegistry::scan_objects` needs.
    pub fn evict_count(&self, target_count: u64) -> u64 {
        let mut freed = 0u64;
        self.root.inode_heat().walk_ascending(|item| {
            if freed >= target_count {
                return false;
            }
            if only_indexed(item) && self.root.inodes().remove(&item.file_id).is_some() {
                freed += 1;
            }
            true
        });
        freed
    }
}
