//! The process-wide flag reporting that the finalization worker is active.
//!
//! Set by the worker the first time it processes a cleaner; read by any
//! component deciding whether asynchronous disposal can be relied upon (for
//! example, whether time-sensitive teardown should wait for the pool or fall
//! back to disposing synchronously). Carries no ordering obligation with the
//! disposal latch; the two flags are independent.

use crate::sync::{AtomicBool, Ordering};

pub(crate) struct WorkerLiveness {
    active: AtomicBool,
}

impl WorkerLiveness {
    pub(crate) const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
        }
    }

    /// Idempotent; the signal never reverts.
    pub(crate) fn mark_active(&self) {
        self.active.store(true, Ordering::Release);
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

static LIVENESS: WorkerLiveness = WorkerLiveness::new();

/// Record that the finalization worker has begun processing work.
///
/// Called by the worker itself on first activity. Idempotent, monotonic for
/// the process lifetime, and visible to every read that happens-after it.
pub fn mark_worker_active() {
    LIVENESS.mark_active();
}

/// Whether the finalization worker has performed any work yet.
pub fn worker_active() -> bool {
    LIVENESS.is_active()
}
