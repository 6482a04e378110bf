//! The `record_access` fast path: the only entry point a VFS read/write
//! hook calls on every I/O operation.
//!
//! Infallible by contract — per `spec.md` §7, allocation failure here is
//! logged at `debug` and the access is simply dropped rather than
//! propagated, since a read/write hook has no sane way to fail the actual
//! I/O over a bookkeeping miss.

use crate::domain::{InodeItem, RangeItem, Tracked};
use crate::root::HotRoot;

/// Record one access of `length` bytes at `offset` in `file_id`.
///
/// A zero-length access is a no-op (nothing to attribute a range to).
pub fn record_access(root: &HotRoot, file_id: u64, offset: u64, length: u64, is_write: bool) {
    if length == 0 {
        tracing::debug!(file_id, "ignoring zero-length access");
        return;
    }

    let config = root.config_snapshot();
    let now = root.clock().now_ns();

    let size_account = root.size_account().clone();
    let inode = match root
        .inodes()
        .find_or_try_insert(file_id, {
            let allocator = root.allocator().clone();
            move || {
                allocator.try_reserve(std::mem::size_of::<InodeItem>() as u64)?;
                Ok(InodeItem::new(file_id, size_account))
            }
        }) {
        Ok((inode, _inserted)) => inode,
        Err(err) => {
            tracing::debug!(file_id, error = %err, "dropping access: inode allocation failed");
            return;
        }
    };

    inode.freq().update(now, is_write, config.freq_power);
    let inode_temp = crate::domain::temperature(inode.freq(), now, &config.temperature);
    root.inode_heat().rebucket(&inode, inode_temp);

    let range_bits = config.range_bits;
    let range_len = 1u64 << range_bits;
    let mut start = (offset >> range_bits) << range_bits;
    let end = offset + length;

    while start < end {
        let size_account = root.size_account().clone();
        let allocator = root.allocator().clone();
        match inode
            .ranges
            .find_or_try_insert(start, move || {
                allocator.try_reserve(std::mem::size_of::<RangeItem>() as u64)?;
                Ok(RangeItem::new(file_id, start, range_len, size_account))
            }) {
            Ok((range, _inserted)) => {
                range.freq().update(now, is_write, config.freq_power);
                let range_temp = crate::domain::temperature(range.freq(), now, &config.temperature);
                root.range_heat().rebucket(&range, range_temp);
            }
            Err(err) => {
                tracing::debug!(
                    file_id,
                    start,
                    error = %err,
                    "dropping range update: allocation failed"
                );
            }
        }
        start += range_len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FakeClock, StdAllocator};
    use crate::config::HotTrackConfig;
    use crate::root::enable_with;
    use std::sync::Arc;

    fn test_root() -> Arc<HotRoot> {
        let handle = enable_with(
            HotTrackConfig::default(),
            Arc::new(FakeClock::new()),
            Arc::new(StdAllocator),
            Arc::new(crate::ports::TokioScheduler),
        );
        // This helper intentionally leaks the handle — only `root()` is
        // needed, and these are short-lived unit tests.
        let handle = handle.expect("valid default config");
        let root = handle.root().clone();
        std::mem::forget(handle);
        root
    }

    #[tokio::test]
    async fn zero_length_access_is_ignored() {
        let root = test_root();
        record_access(&root, 1, 0, 0, false);
        assert_eq!(root.size_account().count(), 0);
    }

    #[tokio::test]
    async fn record_access_creates_inode_and_range() {
        let root = test_root();
        record_access(&root, 1, 0, 4096, false);
        assert_eq!(root.inodes().len(), 1);
        let inode = root.inodes().lookup(&1).unwrap();
        assert_eq!(inode.freq().nr_reads(), 1);
        assert_eq!(inode.ranges.len(), 1);
    }

    #[tokio::test]
    async fn record_access_spans_multiple_ranges() {
        let root = test_root();
        let config = root.config_snapshot();
        let range_len = 1u64 << config.range_bits;
        record_access(&root, 1, range_len - 10, 20, true);
        let inode = root.inodes().lookup(&1).unwrap();
        assert_eq!(inode.ranges.len(), 2);
    }

    #[tokio::test]
    async fn repeated_access_reuses_the_same_inode() {
        let root = test_root();
        record_access(&root, 1, 0, 10, false);
        record_access(&root, 1, 10, 10, false);
        assert_eq!(root.inodes().len(), 1);
        let inode = root.inodes().lookup(&1).unwrap();
        assert_eq!(inode.freq().nr_reads(), 2);
    }
}
