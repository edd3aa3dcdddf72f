//! Basic synchronization primitives.
//!
//! Re-exports the primitives the runtime uses so the rest of the crate has a
//! single import point for atomics and locks.

pub use parking_lot::{Condvar, Mutex, MutexGuard};

pub use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};
