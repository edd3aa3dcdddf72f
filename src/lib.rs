//! # cleaner-rs
//!
//! The deferred finalization (cleaner) subsystem of a managed-object runtime.
//! A [`Cleaner`] pairs a resource with a cleanup action that must run exactly
//! once, asynchronously, after the owning object becomes unreachable. The
//! garbage collector decides *when* an object is finalizable; this crate owns
//! everything that happens afterwards.
//!
//! ## Subsystems
//!
//! - **Cleaners** (`cleaner/`): handle registration, the gated dispose
//!   protocol, and the fatal conversion of cleanup failures.
//! - **Worker Pool** (`cleaner/pool`): the dedicated thread that drains
//!   scheduled cleaners and reports its own liveness.
//! - **Synchronization** (`sync`): the primitives shared by the above.
//!
//! ## Failure model
//!
//! Nothing in the dispose path is recoverable. A cleaner disposed after
//! [`disallow_cleaners`] has taken effect, or a cleanup action that panics,
//! terminates the process after writing a diagnostic to stderr. Recoverable
//! errors exist only at the pool edge ([`PoolError`]).

pub mod cleaner;
pub mod error;
pub mod sync;

pub use cleaner::{
    cleaners_allowed, disallow_cleaners, dispose, mark_worker_active, worker_active, Cleaner,
    CleanerId, CleanerPool, CleanupAction,
};
pub use error::PoolError;
