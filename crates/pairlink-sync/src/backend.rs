//! The boundary to the document/real-time-sync service.

use tokio::sync::watch;

use crate::doc::{Document, Patch};
use crate::error::Result;

/// Live view of a single document. Holds the current value from the moment
/// of subscription and observes every later change; `None` after deletion.
/// Dropping the receiver is the unsubscribe.
pub type DocWatch = watch::Receiver<Option<Document>>;

/// Live view of an ordered collection. Every notification carries the full
/// ordered list, never a delta.
pub type ListWatch = watch::Receiver<Vec<Document>>;

/// Minimal surface of the document store this protocol needs.
///
/// Path layout follows the service conventions: keyed documents like
/// `rooms/{roomId}`, append collections like `rooms/{roomId}/messages`.
#[allow(async_fn_in_trait)] // implementors are used through generics, not trait objects
pub trait SyncBackend: Send + Sync + 'static {
    /// Fetch a document once.
    async fn get(&self, path: &str) -> Result<Option<Document>>;

    /// Atomically create the document unless one already exists at `path`.
    /// Returns `true` iff this call created it; two racing calls converge
    /// on a single document holding the first writer's fields.
    async fn create_if_absent(&self, path: &str, patch: Patch) -> Result<bool>;

    /// Merge the named fields into the document, creating it if absent.
    /// Untouched fields keep their value.
    async fn merge(&self, path: &str, patch: Patch) -> Result<()>;

    /// Delete the document. Deleting a missing document is a no-op.
    async fn delete(&self, path: &str) -> Result<()>;

    /// Append a new document to a collection with a store-assigned id,
    /// insertion order, and timestamps. Returns the stored document so
    /// callers can denormalize the resolved server time.
    async fn add(&self, collection: &str, patch: Patch) -> Result<Document>;

    /// List a collection ordered by (`created_at`, insertion order).
    async fn list(&self, collection: &str) -> Result<Vec<Document>>;

    /// Watch a document, starting from its current value.
    fn watch(&self, path: &str) -> DocWatch;

    /// Watch a collection, starting from its current ordered list.
    fn watch_collection(&self, collection: &str) -> ListWatch;
}
