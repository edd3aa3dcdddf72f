//! Deferred finalization for managed objects.
//!
//! A [`Cleaner`] stands in for a destructor in a garbage-collected object
//! model: it owns a resource and the single action that cleans it up. The
//! collector (external to this module) decides when the owning object is
//! unreachable and then delivers the handle here, exactly once.
//!
//! # Architecture
//!
//! - [`latch`]: process-wide one-way flag that forbids further disposal once
//!   runtime teardown has begun. Checked at the start of every dispose.
//! - [`liveness`]: process-wide one-way flag reporting that the asynchronous
//!   worker has begun operating, for callers choosing between waiting on
//!   asynchronous disposal and a synchronous fallback.
//! - [`dispose`]: the single gated call site that executes a cleaner's
//!   action. Any escaping failure terminates the process.
//! - [`pool`]: the dedicated worker thread that drains scheduled cleaners.
//!
//! # Delivery contract
//!
//! `dispose` takes the handle by value, so disposing the same handle twice is
//! unrepresentable. The collector must not fabricate a second handle for the
//! same registration.

mod dispose;
mod latch;
mod liveness;
mod pool;

pub use dispose::dispose;
pub use latch::{cleaners_allowed, disallow_cleaners};
pub use liveness::{mark_worker_active, worker_active};
pub use pool::CleanerPool;

use crate::sync::{AtomicU64, Ordering};
use std::fmt::{self, Debug, Display, Formatter};

/// Process-unique identifier for a registered cleaner.
///
/// Allocated at registration and stable for the process lifetime; fatal
/// diagnostics name cleaners by this id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CleanerId(pub u64);

impl Display for CleanerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// Id 0 is reserved so a zeroed id is never a live cleaner.
static NEXT_CLEANER_ID: AtomicU64 = AtomicU64::new(1);

/// The boundary through which the runtime invokes user cleanup logic.
///
/// Failure is expressed as a panic; [`dispose`] catches it at the boundary
/// and terminates the process.
pub trait CleanupAction: Send {
    fn run(self: Box<Self>);
}

impl<F: FnOnce() + Send> CleanupAction for F {
    fn run(self: Box<Self>) {
        (*self)()
    }
}

/// A registered cleanup action, plus the resource it consumes.
///
/// Created when a resource needing deterministic cleanup is allocated, and
/// consumed by exactly one [`dispose`] call. A cleaner dropped without being
/// disposed simply drops its resource; the action does not run.
pub struct Cleaner {
    id: CleanerId,
    action: Box<dyn CleanupAction>,
}

impl Cleaner {
    /// Register `clean` to run once for `resource`.
    ///
    /// The action runs on whichever thread ends up disposing the cleaner,
    /// usually the worker pool's.
    pub fn new<T, F>(resource: T, clean: F) -> Self
    where
        T: Send + 'static,
        F: FnOnce(T) + Send + 'static,
    {
        Self::from_action(Box::new(move || clean(resource)))
    }

    /// Register an already-boxed action.
    pub fn from_action(action: Box<dyn CleanupAction>) -> Self {
        Self {
            id: CleanerId(NEXT_CLEANER_ID.fetch_add(1, Ordering::Relaxed)),
            action,
        }
    }

    pub fn id(&self) -> CleanerId {
        self.id
    }

    pub(crate) fn into_parts(self) -> (CleanerId, Box<dyn CleanupAction>) {
        (self.id, self.action)
    }
}

impl Debug for Cleaner {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cleaner").field("id", &self.id).finish()
    }
}
