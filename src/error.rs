use thiserror::Error;

/// Errors surfaced by the cleaner pool.
///
/// The dispose path itself has no recoverable errors; every fault there
/// terminates the process. See [`crate::cleaner::dispose`].
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to spawn cleaner worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("cleaner pool is already stopped")]
    AlreadyStopped,
}
