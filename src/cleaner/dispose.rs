//! The gated entry point that executes a cleaner's action.

use super::{latch, Cleaner};
use std::panic::{self, AssertUnwindSafe};
use std::process;

/// Dispose `cleaner` now, on the calling thread.
///
/// Called exactly once per finalizable object; taking the handle by value is
/// what enforces that. The latch is consulted before the action runs, not
/// re-checked once it is in flight.
///
/// This function either returns after the action completes, or does not
/// return at all:
///
/// - if [`disallow_cleaners`](super::disallow_cleaners) has taken effect, the
///   process terminates with a diagnostic naming the cleaner;
/// - if the action panics, the panic is caught at this boundary and the
///   process terminates. There is no caller to propagate to: disposal runs
///   off the thread that owned the object.
pub fn dispose(cleaner: Cleaner) {
    let (id, action) = cleaner.into_parts();

    if !latch::cleaners_allowed() {
        eprintln!("cleaner {id} was stored in a global object. This is not allowed");
        eprintln!("terminating now");
        process::abort();
    }

    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| action.run())) {
        // The default panic hook has already printed the message and any
        // backtrace; name the cleaner before going down.
        let detail = if let Some(s) = payload.downcast_ref::<&str>() {
            *s
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.as_str()
        } else {
            "non-string panic payload"
        };
        eprintln!("cleanup action for cleaner {id} panicked: {detail}");
        eprintln!("terminating now");
        process::abort();
    }
}
