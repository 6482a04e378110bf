//! The periodic aging sweep: recompute temperature for every tracked entity
//! and move it into its current heat bucket, then run the memory-pressure
//! eviction pass.
//!
//! Runs on whatever cadence `hot_update_interval_secs` configures, driven by
//! a [`crate::ports::TaskScheduler`]. Never holds the inode index's lock
//! across the inner per-range work — it walks a point-in-time snapshot
//! instead, the same requirement `OrderedIndex::iter_snapshot` exists for.

use std::sync::Arc;

use crate::domain::Tracked;
use crate::governor::MemoryGovernor;
use crate::root::HotRoot;

pub struct AgingWorker {
    root: Arc<HotRoot>,
}

impl AgingWorker {
    pub fn new(root: Arc<HotRoot>) -> Self {
        Self { root }
    }

    /// Run one full sweep: rebucket every inode and range by current
    /// temperature, then let the memory governor evict if over budget.
    pub fn tick(&self) {
        let now = self.root.clock().now_ns();
        let coeffs = self.root.config_snapshot().temperature;

        for (_, inode) in self.root.inodes().iter_snapshot() {
            let temp = crate::domain::temperature(inode.freq(), now, &coeffs);
            self.root.inode_heat().rebucket(&inode, temp);

            for (_, range) in inode.ranges.iter_snapshot() {
                let range_temp = crate::domain::temperature(range.freq(), now, &coeffs);
                self.root.range_heat().rebucket(&range, range_temp);
            }
        }

        MemoryGovernor::new(self.root.clone()).high_watermark_sweep();
    }
}
