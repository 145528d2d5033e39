//! # pairlink-sync
//!
//! Thin boundary to the hosted document/real-time-sync service: documents as
//! JSON field maps, field-level merge patches with server-assigned
//! timestamps, an atomic create-if-absent primitive, and live watches that
//! deliver the current value immediately and every change afterwards.
//!
//! Ships an in-memory backend with identical semantics, so the whole
//! protocol stack unit-tests without a network dependency.

pub mod backend;
pub mod clock;
pub mod doc;
pub mod memory;

mod error;

pub use backend::{DocWatch, ListWatch, SyncBackend};
pub use clock::{Clock, ManualClock, SystemClock};
pub use doc::{Document, Fields, Patch, WriteValue};
pub use error::{Result, SyncError};
pub use memory::MemoryBackend;
