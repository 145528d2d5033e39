use thiserror::Error;

/// Errors produced by the sync backend boundary.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The backing service could not be reached or rejected the request.
    /// Retrying is the caller's decision, never automatic.
    #[error("Sync backend unavailable: {0}")]
    Unavailable(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SyncError>;
