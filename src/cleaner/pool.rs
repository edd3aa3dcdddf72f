//! The dedicated worker that drains scheduled cleaners.

use super::{dispose::dispose, liveness, Cleaner, CleanerId};
use crate::error::PoolError;
use crate::sync::{Arc, AtomicBool, Condvar, Mutex, Ordering};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Asynchronous disposal worker.
///
/// The collector hands finalizable handles to [`schedule`](Self::schedule);
/// a single named thread dequeues them in order and feeds each one to
/// [`dispose`]. The worker reports its own liveness through
/// [`mark_worker_active`](super::mark_worker_active) the first time it picks
/// up a cleaner.
///
/// Scheduling after [`shutdown`](Self::shutdown) drops the handle without
/// running its action; by the time the pool stops, the runtime can no longer
/// promise the action a safe environment.
pub struct CleanerPool {
    shared: Arc<PoolShared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

struct PoolShared {
    state: Mutex<PoolState>,
    /// Wakes the worker when work arrives or the pool stops.
    work_available: Condvar,
    /// Wakes `flush` callers when the worker drains the queue.
    idle: Condvar,
    /// Set once by `shutdown`; never cleared.
    stopped: AtomicBool,
    /// Every scheduled cleaner that has not finished disposal yet.
    pending: DashMap<CleanerId, ()>,
}

struct PoolState {
    queue: VecDeque<Cleaner>,
    /// True while the worker is mid-dispose on a dequeued cleaner.
    busy: bool,
}

impl CleanerPool {
    /// Spawn the worker thread.
    pub fn start() -> Result<Self, PoolError> {
        let shared = Arc::new(PoolShared {
            state: Mutex::new(PoolState {
                queue: VecDeque::new(),
                busy: false,
            }),
            work_available: Condvar::new(),
            idle: Condvar::new(),
            stopped: AtomicBool::new(false),
            pending: DashMap::new(),
        });

        let worker_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("cleaner-pool".into())
            .spawn(move || worker_loop(worker_shared))?;

        Ok(Self {
            shared,
            worker: Mutex::new(Some(handle)),
        })
    }

    /// Enqueue `cleaner` for asynchronous disposal.
    ///
    /// After [`shutdown`](Self::shutdown) the handle is dropped unrun and the
    /// drop is logged.
    pub fn schedule(&self, cleaner: Cleaner) {
        if self.shared.stopped.load(Ordering::Acquire) {
            warn!(id = %cleaner.id(), "cleaner scheduled after pool shutdown; its action will not run");
            return;
        }

        self.shared.pending.insert(cleaner.id(), ());
        debug!(id = %cleaner.id(), "cleaner scheduled");
        let mut state = self.shared.state.lock();
        state.queue.push_back(cleaner);
        self.shared.work_available.notify_one();
    }

    /// Block until every cleaner scheduled so far has been disposed.
    pub fn flush(&self) {
        let mut state = self.shared.state.lock();
        while !state.queue.is_empty() || state.busy {
            self.shared.idle.wait(&mut state);
        }
    }

    /// Stop accepting work, drain what is already queued, and join the
    /// worker thread.
    pub fn shutdown(&self) -> Result<(), PoolError> {
        if self.shared.stopped.swap(true, Ordering::AcqRel) {
            return Err(PoolError::AlreadyStopped);
        }
        self.shared.work_available.notify_all();

        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            // The worker converts action failures into process termination,
            // so a join error is unreachable in practice.
            let _ = handle.join();
        }

        // Anything still queued raced with shutdown and will never run.
        let mut state = self.shared.state.lock();
        for cleaner in state.queue.drain(..) {
            self.shared.pending.remove(&cleaner.id());
            warn!(id = %cleaner.id(), "cleaner dropped unrun at pool shutdown");
        }
        Ok(())
    }

    /// Number of cleaners scheduled but not yet disposed.
    pub fn pending_count(&self) -> usize {
        self.shared.pending.len()
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::Acquire)
    }
}

impl Drop for CleanerPool {
    fn drop(&mut self) {
        if !self.shared.stopped.swap(true, Ordering::AcqRel) {
            self.shared.work_available.notify_all();
            if let Some(handle) = self.worker.lock().take() {
                let _ = handle.join();
            }
        }
    }
}

fn worker_loop(shared: Arc<PoolShared>) {
    let mut first_work = true;
    loop {
        let next = {
            let mut state = shared.state.lock();
            state.busy = false;
            if state.queue.is_empty() {
                shared.idle.notify_all();
            }
            loop {
                if let Some(cleaner) = state.queue.pop_front() {
                    state.busy = true;
                    break Some(cleaner);
                }
                if shared.stopped.load(Ordering::Acquire) {
                    break None;
                }
                shared.work_available.wait(&mut state);
            }
        };

        let Some(cleaner) = next else { break };

        if first_work {
            liveness::mark_worker_active();
            first_work = false;
        }

        let id = cleaner.id();
        debug!(%id, "disposing cleaner");
        dispose(cleaner);
        shared.pending.remove(&id);
    }

    shared.idle.notify_all();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[test]
    fn scheduled_action_runs_exactly_once() {
        let pool = CleanerPool::start().unwrap();
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&runs);
        pool.schedule(Cleaner::new(counter, |counter| {
            counter.fetch_add(1, Ordering::AcqRel);
        }));

        pool.flush();
        assert_eq!(runs.load(Ordering::Acquire), 1);
        assert_eq!(pool.pending_count(), 0);
    }

    #[test]
    fn flush_waits_for_slow_actions() {
        let pool = CleanerPool::start().unwrap();
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&runs);
        pool.schedule(Cleaner::new(counter, |counter| {
            thread::sleep(Duration::from_millis(50));
            counter.fetch_add(1, Ordering::AcqRel);
        }));

        pool.flush();
        assert_eq!(runs.load(Ordering::Acquire), 1);
    }

    #[test]
    fn cleaners_run_in_schedule_order() {
        let pool = CleanerPool::start().unwrap();
        let order = Arc::new(Mutex::new(Vec::new()));

        for n in 0..8 {
            let order = Arc::clone(&order);
            pool.schedule(Cleaner::new(n, move |n| order.lock().push(n)));
        }

        pool.flush();
        assert_eq!(*order.lock(), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn shutdown_drains_queued_cleaners() {
        let pool = CleanerPool::start().unwrap();
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..16 {
            let counter = Arc::clone(&runs);
            pool.schedule(Cleaner::new(counter, |counter| {
                counter.fetch_add(1, Ordering::AcqRel);
            }));
        }

        pool.shutdown().unwrap();
        assert_eq!(runs.load(Ordering::Acquire), 16);
        assert!(pool.is_stopped());
    }

    #[test]
    fn second_shutdown_is_an_error() {
        let pool = CleanerPool::start().unwrap();
        pool.shutdown().unwrap();
        assert!(matches!(pool.shutdown(), Err(PoolError::AlreadyStopped)));
    }

    #[test]
    fn schedule_after_shutdown_drops_without_running() {
        let pool = CleanerPool::start().unwrap();
        pool.shutdown().unwrap();

        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        pool.schedule(Cleaner::new(counter, |counter| {
            counter.fetch_add(1, Ordering::AcqRel);
        }));

        assert_eq!(runs.load(Ordering::Acquire), 0);
        assert_eq!(pool.pending_count(), 0);
        // The resource itself is released even though the action never ran.
        assert_eq!(Arc::strong_count(&runs), 1);
    }
}
