//! Error types for the hot-tracking engine.

use thiserror::Error;

/// Errors surfaced by the lifecycle API (`enable`, `disable`, `on_unlink`)
/// and by port adapters.
///
/// Ingress (`record_access`) never returns this type: allocation failures
/// there are logged at `debug` and the access is dropped, per the engine's
/// graceful-degradation contract.
#[derive(Debug, Error)]
pub enum HotTrackError {
    /// The allocator (or a configured memory budget) could not satisfy a
    /// request during `enable`.
    #[error("hot-tracking engine is out of memory")]
    OutOfMemory,

    /// A lookup (e.g. `on_unlink`, a CLI report query) addressed a file or
    /// range that is not currently tracked.
    #[error("no tracked entry for file {0}")]
    NotFound(u64),

    /// `enable` was called on a root that is already enabled.
    #[error("hot-tracking engine is already enabled")]
    AlreadyEnabled,

    /// `disable` (or a lifecycle operation requiring an enabled engine) was
    /// called on a root that is not enabled.
    #[error("hot-tracking engine is not enabled")]
    NotEnabled,

    /// A caller-supplied argument violates a documented precondition, e.g.
    /// a zero-length access or an invalid config value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    Config(#[from] anyhow::Error),
}
