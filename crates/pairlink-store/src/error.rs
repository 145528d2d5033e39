use pairlink_shared::RoomId;
use pairlink_sync::SyncError;
use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// An identity was missing its user id or username. Local precondition
    /// failure, never retried.
    #[error("Invalid identity: userId and username must be non-empty")]
    InvalidIdentity,

    /// A room expected to exist does not.
    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    /// The message text was empty after trimming. Nothing was stored.
    #[error("Empty message")]
    EmptyMessage,

    /// Failure from the sync backend.
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// A stored document did not decode into its model.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
