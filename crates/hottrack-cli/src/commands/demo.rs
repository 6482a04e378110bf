//! Shared in-process engine construction for CLI commands.
//!
//! There is no real kernel to attach `hottrack report`/`hottrack stats` to,
//! so both commands build their own `HotRoot` and optionally replay a list
//! of synthetic accesses into it before inspecting it.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use hottrack_core::ports::{StdAllocator, SystemClock, TaskHandle, TaskScheduler};
use hottrack_core::{record_access, HotRoot, HotTrackConfig};

/// One synthetic access, parsed from `file_id:offset:length:r|w`.
pub struct AccessSpec {
    pub file_id: u64,
    pub offset: u64,
    pub length: u64,
    pub is_write: bool,
}

impl AccessSpec {
    pub fn parse(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.split(':').collect();
        let [file_id, offset, length, op] = parts.as_slice() else {
            bail!("expected file_id:offset:length:r|w, got '{raw}'");
        };
        let is_write = match *op {
            "r" => false,
            "w" => true,
            other => bail!("expected 'r' or 'w' for op, got '{other}'"),
        };
        Ok(Self {
            file_id: file_id.parse().context("invalid file_id")?,
            offset: offset.parse().context("invalid offset")?,
            length: length.parse().context("invalid length")?,
            is_write,
        })
    }
}

/// A scheduler that never actually calls its task; CLI commands are
/// one-shot queries, so the aging worker has nothing to do here.
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

/// Enable an engine in-process and replay `accesses` into it.
pub fn build_demo_root(config: HotTrackConfig, accesses: &[AccessSpec]) -> Result<Arc<HotRoot>> {
    let handle = hottrack_core::enable_with(
        config,
        Arc::new(SystemClock),
        Arc::new(StdAllocator),
        Arc::new(NoopScheduler),
    )
    .context("failed to construct in-process engine")?;

    let root = handle.root().clone();
    for access in accesses {
        record_access(&root, access.file_id, access.offset, access.length, access.is_write);
    }
    // NoopScheduler never drives the aging worker on its own, and the CLI
    // has no background task to wait on, so run one sweep synchronously
    // before handing the root back for inspection.
    hottrack_core::aging::AgingWorker::new(root.clone()).tick();
    Ok(root)
}
