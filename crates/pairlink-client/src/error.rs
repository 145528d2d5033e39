use thiserror::Error;

use pairlink_store::StoreError;

/// Errors surfaced by client-side flows.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Scanned payload was malformed or not a join payload. The scanner
    /// re-arms after surfacing this.
    #[error("Invalid QR payload")]
    InvalidQrPayload,

    /// Attempted to send while the room gate is locked. The input is
    /// disabled upstream, so reaching this is a defensive failure.
    #[error("Chat is locked")]
    GateClosed,

    /// Username was empty after trimming.
    #[error("Username must not be empty")]
    EmptyUsername,

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Identity file I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Identity record (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failure from the store layer.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
