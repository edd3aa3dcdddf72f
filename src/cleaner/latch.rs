//! The process-wide flag forbidding further cleaner execution.
//!
//! During runtime teardown, objects reachable from global roots may already
//! have lost the dependencies their cleanup actions rely on. The teardown
//! sequencer flips this latch once, after which any attempt to dispose a
//! cleaner is a fatal policy violation (see [`super::dispose`]).
//!
//! Disposal can be driven from an arbitrary worker thread, so the latch is a
//! single process-wide atomic with release stores and acquire loads, never
//! thread-local state. It is read on every disposal and written once.

use crate::sync::{AtomicBool, Ordering};

pub(crate) struct DisposalLatch {
    disallowed: AtomicBool,
}

impl DisposalLatch {
    pub(crate) const fn new() -> Self {
        Self {
            disallowed: AtomicBool::new(false),
        }
    }

    /// Idempotent; the latch never transitions back.
    pub(crate) fn disallow(&self) {
        self.disallowed.store(true, Ordering::Release);
    }

    pub(crate) fn is_allowed(&self) -> bool {
        !self.disallowed.load(Ordering::Acquire)
    }
}

static LATCH: DisposalLatch = DisposalLatch::new();

/// Forbid all further cleaner disposal, process-wide.
///
/// Callable from any thread; takes effect for every dispose call that
/// happens-after it. Idempotent, and never reversed for the remainder of the
/// process lifetime.
pub fn disallow_cleaners() {
    LATCH.disallow();
}

/// Whether cleaner disposal is still permitted.
pub fn cleaners_allowed() -> bool {
    LATCH.is_allowed()
}
