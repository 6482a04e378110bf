//! End-to-end scenarios against the public lifecycle/ingress API, covering
//! the engine's documented invariants and round-trip properties.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use hottrack_core::domain::{InodeItem, RangeItem};
use hottrack_core::governor::MemoryGovernor;
use hottrack_core::ports::{
    FakeClock, InProcessShrinkerRegistry, ScanOutcome, ShrinkerRegistry, StdAllocator, TaskHandle,
    TaskScheduler,
};
use hottrack_core::{disable, enable_with, on_unlink, record_access, HotRoot, HotTrackConfig, HotTrackError};

/// Never actually drives the aging worker; scenarios call `record_access`
/// and inspect state without needing a background sweep, except where a
/// scenario explicitly runs one itself via `aging::AgingWorker`.
struct NoopScheduler;

impl TaskScheduler for NoopScheduler {
    fn schedule_periodic(
        &self,
        _interval: Duration,
        _task: Box<dyn Fn() + Send + Sync>,
    ) -> TaskHandle {
        TaskHandle::noop()
    }
}

fn test_root(config: HotTrackConfig, clock: Arc<FakeClock>) -> Arc<HotRoot> {
    let handle = enable_with(
        config,
        clock,
        Arc::new(StdAllocator),
        Arc::new(NoopScheduler),
    )
    .expect("enable with a valid config must succeed");
    let root = handle.root().clone();
    // No background worker to cancel (NoopScheduler), so leaking the
    // handle just drops its JoinHandle-free TaskHandle; the root lives on
    // through the clone above.
    std::mem::forget(handle);
    root
}

/// S1 — cold-to-hot migration: a freshly-touched file starts at temperature
/// 0 (no history) and strictly increases as further accesses accumulate.
#[test]
fn s1_cold_to_hot_migration() {
    let clock = Arc::new(FakeClock::new());
    let mut config = HotTrackConfig::default();
    config.map_bits = 8;
    config.range_bits = 20;
    config.freq_power = 4;
    let root = test_root(config, clock.clone());

    record_access(&root, 42, 0, 1 << 20, false);
    let initial = root.report(42);
    assert_eq!(initial.live, 1);
    assert_eq!(initial.num_reads, 1);
    let cold_bucket_ceiling = 1u32 << (32 - 8); // map_bits=8: bucket 0 covers [0, 2^24)
    assert!(
        initial.temperature < cold_bucket_ceiling,
        "a single touch must still land in the coldest bucket"
    );

    for _ in 0..1000 {
        clock.advance(1_000_000); // 1ms in ns
        record_access(&root, 42, 0, 1 << 20, false);
    }

    let warmed = root.report(42);
    assert!(warmed.num_reads >= 1000);
    assert!(
        warmed.temperature >= cold_bucket_ceiling,
        "1000 further accesses must migrate the item out of the coldest bucket"
    );
}

/// S2 — range alignment: an access spanning a range boundary creates
/// exactly the two aligned ranges it overlaps.
#[test]
fn s2_range_alignment() {
    let clock = Arc::new(FakeClock::new());
    let mut config = HotTrackConfig::default();
    config.range_bits = 20;
    let root = test_root(config, clock);

    let range_size = 1u64 << 20;
    record_access(&root, 7, range_size - 1, 2, true);

    assert_eq!(root.inode_count(), 1);
    assert_eq!(root.range_count(), 2, "a 2-byte write straddling the boundary touches exactly two ranges");
}

/// S3 — concurrent insertion race: many threads racing to create the same
/// inode must still leave exactly one InodeItem behind, with a plausible
/// read count (atomic counter loss under races is permitted by spec).
#[test]
fn s3_concurrent_insertion_race() {
    let clock = Arc::new(FakeClock::new());
    let root = test_root(HotTrackConfig::default(), clock);

    let threads: Vec<_> = (0..64)
        .map(|_| {
            let root = root.clone();
            thread::spawn(move || {
                record_access(&root, 99, 0, 1, false);
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }

    assert_eq!(root.inode_count(), 1, "exactly one InodeItem must survive the race");
    let report = root.report(99);
    assert!(report.num_reads >= 1 && report.num_reads <= 64);
}

/// S4 — shrinker under memory pressure: scanning frees the requested
/// count when nothing is externally referenced, and refuses to free
/// anything when asked to avoid filesystem recursion.
#[test]
fn s4_shrinker_under_pressure() {
    let clock = Arc::new(FakeClock::new());
    let root = test_root(HotTrackConfig::default(), clock);

    for file_id in 0..10_000u64 {
        record_access(&root, file_id, 0, 16, false);
    }
    assert_eq!(root.inode_count(), 10_000);

    let governor = Arc::new(MemoryGovernor::new(root.clone()));
    let registry = InProcessShrinkerRegistry::new(governor);

    match registry.scan_objects(5_000, false) {
        ScanOutcome::Freed(freed) => assert!(freed >= 5_000),
        ScanOutcome::Stopped => panic!("scan without the recursion-avoidance flag must not stop early"),
    }
    assert!(root.inode_count() <= 5_000);

    assert_eq!(registry.scan_objects(1, true), ScanOutcome::Stopped);
}

/// S5 — unlink semantics: removing a file's InodeItem (and its ranges,
/// transitively) frees its accounted bytes and makes it unreachable.
#[test]
fn s5_unlink_semantics() {
    let clock = Arc::new(FakeClock::new());
    let mut config = HotTrackConfig::default();
    config.range_bits = 10; // small ranges so 4 distinct ones are cheap to create
    let root = test_root(config, clock);

    let range_size = 1u64 << 10;
    for i in 0..4u64 {
        record_access(&root, 3, i * range_size, 1, false);
    }
    assert_eq!(root.report(3).live, 1);
    assert_eq!(root.range_count(), 4);

    let before_bytes = root.size_account().bytes();
    let expected_freed =
        std::mem::size_of::<InodeItem>() as u64 + 4 * std::mem::size_of::<RangeItem>() as u64;

    on_unlink(&root, 3).unwrap();

    assert_eq!(before_bytes - root.size_account().bytes(), expected_freed);
    assert_eq!(root.report(3).live, 0);
    assert!(matches!(on_unlink(&root, 3), Err(HotTrackError::NotFound(3))));
}

/// S6 — shutdown quiescence: after `disable` returns, every tracked byte
/// has been released regardless of how much concurrent ingress preceded
/// it.
#[test]
fn s6_shutdown_quiescence() {
    let clock = Arc::new(FakeClock::new());
    let handle = enable_with(
        HotTrackConfig::default(),
        clock,
        Arc::new(StdAllocator),
        Arc::new(NoopScheduler),
    )
    .unwrap();
    let root = handle.root().clone();

    let next_file_id = Arc::new(AtomicU64::new(0));
    let threads: Vec<_> = (0..8)
        .map(|_| {
            let root = root.clone();
            let next_file_id = next_file_id.clone();
            thread::spawn(move || {
                for _ in 0..1_000 {
                    let file_id = next_file_id.fetch_add(1, Ordering::Relaxed) % 500;
                    record_access(&root, file_id, 0, 64, file_id % 2 == 0);
                }
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }
    assert!(root.size_account().bytes() > 0);

    disable(handle).unwrap();
    assert_eq!(root.size_account().bytes(), 0);
    assert_eq!(root.size_account().count(), 0);
}

/// Invariant 6 / round-trip property 6: zero-length accesses are no-ops.
#[test]
fn zero_length_access_is_a_no_op() {
    let clock = Arc::new(FakeClock::new());
    let root = test_root(HotTrackConfig::default(), clock);

    record_access(&root, 1, 0, 0, false);
    assert_eq!(root.inode_count(), 0);
    assert_eq!(root.size_account().bytes(), 0);
}

/// Round-trip property 8: unlinking and re-accessing a file re-creates a
/// clean InodeItem rather than reviving stale state.
#[test]
fn unlink_then_reaccess_recreates_cleanly() {
    let clock = Arc::new(FakeClock::new());
    let root = test_root(HotTrackConfig::default(), clock);

    record_access(&root, 5, 0, 16, false);
    record_access(&root, 5, 0, 16, false);
    assert_eq!(root.report(5).num_reads, 2);

    on_unlink(&root, 5).unwrap();
    assert_eq!(root.report(5).live, 0);

    record_access(&root, 5, 0, 16, false);
    assert_eq!(root.report(5).num_reads, 1, "re-created item must not carry over the old read count");
}
