//! `HotRoot`: the per-filesystem owner of the inode index, both heat maps,
//! and the size account, plus the lifecycle API (`enable`/`disable`/
//! `on_unlink`) from `spec.md` §6.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::config::HotTrackConfig;
use crate::domain::{HeatReport, InodeItem, RangeItem, SizeAccount, Tracked};
use crate::error::HotTrackError;
use crate::heatmap::HeatMap;
use crate::index::OrderedIndex;
use crate::ports::{
    Clock, SlabAllocator, StdAllocator, SystemClock, TaskHandle, TaskScheduler, TokioScheduler,
};

/// The tracking engine's full in-memory state for one host filesystem.
pub struct HotRoot {
    config: RwLock<HotTrackConfig>,
    inodes: OrderedIndex<u64, InodeItem>,
    inode_heat: HeatMap<InodeItem>,
    range_heat: HeatMap<RangeItem>,
    size_account: Arc<SizeAccount>,
    clock: Arc<dyn Clock>,
    allocator: Arc<dyn SlabAllocator>,
    enabled: AtomicBool,
}

impl HotRoot {
    fn new(
        config: HotTrackConfig,
        clock: Arc<dyn Clock>,
        allocator: Arc<dyn SlabAllocator>,
    ) -> Arc<Self> {
        let size_account = Arc::new(SizeAccount::new());
        let map_bits = config.map_bits;
        Arc::new(Self {
            config: RwLock::new(config),
            inodes: OrderedIndex::new(size_account.clone()),
            inode_heat: HeatMap::new(map_bits),
            range_heat: HeatMap::new(map_bits),
            size_account,
            clock,
            allocator,
            enabled: AtomicBool::new(true),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn config_snapshot(&self) -> HotTrackConfig {
        self.config.read().unwrap().clone()
    }

    pub fn update_config(&self, config: HotTrackConfig) {
        *self.config.write().unwrap() = config;
    }

    pub(crate) fn inodes(&self) -> &OrderedIndex<u64, InodeItem> {
        &self.inodes
    }

    pub(crate) fn inode_heat(&self) -> &HeatMap<InodeItem> {
        &self.inode_heat
    }

    pub(crate) fn range_heat(&self) -> &HeatMap<RangeItem> {
        &self.range_heat
    }

    pub fn size_account(&self) -> &Arc<SizeAccount> {
        &self.size_account
    }

    /// Number of tracked inodes, for telemetry.
    pub fn inode_count(&self) -> usize {
        self.inodes.len()
    }

    /// Number of tracked ranges across every inode, for telemetry. Walks a
    /// snapshot of the inode index, so it never holds the index lock while
    /// summing per-inode range counts.
    pub fn range_count(&self) -> usize {
        self.inodes
            .iter_snapshot()
            .into_iter()
            .map(|(_, inode)| inode.ranges.len())
            .sum()
    }

    /// Bucket populations of the inode heat map, coldest first.
    pub fn inode_bucket_occupancy(&self) -> Vec<usize> {
        self.inode_heat.occupancy()
    }

    /// Bucket populations of the range heat map, coldest first.
    pub fn range_bucket_occupancy(&self) -> Vec<usize> {
        self.range_heat.occupancy()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub(crate) fn allocator(&self) -> &Arc<dyn SlabAllocator> {
        &self.allocator
    }

    /// Render a [`HeatReport`] for `file_id` at the current instant, or an
    /// "absent" report if the file has no tracked state.
    pub fn report(&self, file_id: u64) -> HeatReport {
        match self.inodes.lookup(&file_id) {
            Some(inode) => {
                let now = self.clock.now_ns();
                let coeffs = self.config_snapshot().temperature;
                let temp = crate::domain::temperature(inode.freq(), now, &coeffs);
                HeatReport::from_item(&inode, temp)
            }
            None => HeatReport::absent(),
        }
    }
}

/// A live, enabled engine plus the plumbing needed to tear it down again.
pub struct HotTrackHandle {
    root: Arc<HotRoot>,
    worker: TaskHandle,
}

impl HotTrackHandle {
    pub fn root(&self) -> &Arc<HotRoot> {
        &self.root
    }
}

/// Enable the engine with production-grade default adapters: a
/// `SystemClock`, an unbounded `StdAllocator`, and a `TokioScheduler`
/// driving the aging worker.
///
/// Requires a tokio runtime to already be running (the scheduler spawns
/// onto it).
pub fn enable(config: HotTrackConfig) -> Result<HotTrackHandle, HotTrackError> {
    enable_with(
        config,
        Arc::new(SystemClock),
        Arc::new(StdAllocator),
        Arc::new(TokioScheduler),
    )
}

/// Enable with explicit port adapters — the entry point tests use to swap
/// in a `FakeClock` for deterministic aging.
pub fn enable_with(
    config: HotTrackConfig,
    clock: Arc<dyn Clock>,
    allocator: Arc<dyn SlabAllocator>,
    scheduler: Arc<dyn TaskScheduler>,
) -> Result<HotTrackHandle, HotTrackError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(HotTrackError::InvalidArgument(
            errors
                .into_iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        ));
    }

    let interval = config.hot_update_interval();
    let root = HotRoot::new(config, clock, allocator);

    info!(interval_secs = interval.as_secs(), "hot-tracking engine enabled");

    let worker_root = root.clone();
    let worker = scheduler.schedule_periodic(
        interval,
        Box::new(move || {
            crate::aging::AgingWorker::new(worker_root.clone()).tick();
        }),
    );

    Ok(HotTrackHandle { root, worker })
}

/// Disable the engine: cancel the aging worker, then drop every tracked
/// item (cascading range drops along with their owning inodes). Every
/// handle into the index is an `Arc`/`Weak` pair, so a reader that is mid
/// traversal simply keeps its own clone alive until it drops it; there is
/// no separate grace period to wait out.
pub fn disable(handle: HotTrackHandle) -> Result<(), HotTrackError> {
    let HotTrackHandle { root, worker } = handle;
    worker.cancel_sync();
    root.enabled.store(false, Ordering::Release);
    let count = root.inodes.len();
    root.inodes.clear();
    debug!(inodes_dropped = count, "hot-tracking engine disabled");
    Ok(())
}

/// Force-remove the inode (and transitively its ranges) tracked for
/// `file_id`, regardless of whether external callers still hold a
/// reference to it. Returns `NotFound` if the file was never tracked.
pub fn on_unlink(root: &HotRoot, file_id: u64) -> Result<(), HotTrackError> {
    match root.inodes.remove(&file_id) {
        Some(item) => {
            root.inode_heat.unlink(&item);
            drop(item);
            Ok(())
        }
        None => Err(HotTrackError::NotFound(file_id)),
    }
}
