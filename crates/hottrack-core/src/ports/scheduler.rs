//! Periodic task scheduling, abstracted so `hottrack-core` stays
//! executor-agnostic (`spec.md` §5's requirement that the engine never
//! assumes a particular async runtime is running it).

use std::time::Duration;

use tokio::task::JoinHandle;

enum Inner {
    Real(JoinHandle<()>),
    Noop,
}

/// A handle to a scheduled periodic task.
pub struct TaskHandle(Inner);

impl TaskHandle {
    /// A handle that cancels nothing, for tests that never actually want
    /// the aging worker to run on a real executor.
    pub fn noop() -> Self {
        Self(Inner::Noop)
    }

    /// Cancel the task without waiting for its current tick to finish.
    pub fn cancel_sync(self) {
        if let Inner::Real(join) = self.0 {
            join.abort();
        }
    }
}

pub trait TaskScheduler: Send + Sync {
    /// Run `task` every `interval`, starting after the first interval
    /// elapses, until the returned handle is cancelled.
    fn schedule_periodic(
        &self,
        interval: Duration,
        task: Box<dyn Fn() + Send + Sync>,
    ) -> TaskHandle;
}

/// Default adapter: `tokio::spawn` driving a `tokio::time::interval` loop.
#[derive(Debug, Default)]
pub struct TokioScheduler;

impl TaskScheduler for TokioScheduler {
    fn schedule_periodic(
        &self,
        interval: Duration,
        task: Box<dyn Fn() + Send + Sync>,
    ) -> TaskHandle {
        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so the first real
            // sweep happens after one full interval, matching the aging
            // worker's documented cadence.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                task();
            }
        });
        TaskHandle(Inner::Real(join))
    }
}
