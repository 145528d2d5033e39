//! In-memory backend with the same atomicity and subscription semantics as
//! the hosted service. Production code reaches the real service through the
//! same [`SyncBackend`] trait; tests and local tooling run on this.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::backend::{DocWatch, ListWatch, SyncBackend};
use crate::clock::{Clock, SystemClock};
use crate::doc::{Document, Patch};
use crate::error::Result;

/// Single-process document store. All mutations run under one lock, which
/// is what makes `create_if_absent` a genuine conditional write under
/// concurrent pairing attempts.
pub struct MemoryBackend {
    clock: Arc<dyn Clock>,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    docs: HashMap<String, Document>,
    collections: HashMap<String, Vec<Document>>,
    next_seq: u64,
    doc_watchers: HashMap<String, watch::Sender<Option<Document>>>,
    list_watchers: HashMap<String, watch::Sender<Vec<Document>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Use an explicit clock for server-timestamp assignment.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(State::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("backend state lock")
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn notify_doc(&self, path: &str) {
        if let Some(tx) = self.doc_watchers.get(path) {
            tx.send_replace(self.docs.get(path).cloned());
        }
    }

    fn notify_collection(&self, collection: &str) {
        if let Some(tx) = self.list_watchers.get(collection) {
            tx.send_replace(ordered(self.collections.get(collection)));
        }
    }
}

/// Clone a collection in delivery order: server timestamp first, insertion
/// order as tie-break.
fn ordered(docs: Option<&Vec<Document>>) -> Vec<Document> {
    let mut list = docs.cloned().unwrap_or_default();
    list.sort_by(|a, b| (a.created_at, a.seq).cmp(&(b.created_at, b.seq)));
    list
}

fn doc_id_from_path(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}

impl SyncBackend for MemoryBackend {
    async fn get(&self, path: &str) -> Result<Option<Document>> {
        Ok(self.lock().docs.get(path).cloned())
    }

    async fn create_if_absent(&self, path: &str, patch: Patch) -> Result<bool> {
        let now = self.clock.now();
        let mut state = self.lock();

        if state.docs.contains_key(path) {
            return Ok(false);
        }

        let seq = state.bump_seq();
        let doc = Document {
            id: doc_id_from_path(path),
            seq,
            created_at: now,
            fields: patch.resolve(now),
        };
        state.docs.insert(path.to_string(), doc);
        state.notify_doc(path);

        debug!(path, "document created");
        Ok(true)
    }

    async fn merge(&self, path: &str, patch: Patch) -> Result<()> {
        let now = self.clock.now();
        let mut state = self.lock();
        let resolved = patch.resolve(now);

        if let Some(doc) = state.docs.get_mut(path) {
            for (name, value) in resolved {
                doc.fields.insert(name, value);
            }
        } else {
            let seq = state.bump_seq();
            let doc = Document {
                id: doc_id_from_path(path),
                seq,
                created_at: now,
                fields: resolved,
            };
            state.docs.insert(path.to_string(), doc);
        }
        state.notify_doc(path);

        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let mut state = self.lock();
        if state.docs.remove(path).is_some() {
            state.notify_doc(path);
            debug!(path, "document deleted");
        }
        Ok(())
    }

    async fn add(&self, collection: &str, patch: Patch) -> Result<Document> {
        let now = self.clock.now();
        let mut state = self.lock();

        let seq = state.bump_seq();
        let doc = Document {
            id: Uuid::new_v4().to_string(),
            seq,
            created_at: now,
            fields: patch.resolve(now),
        };
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(doc.clone());
        state.notify_collection(collection);

        debug!(collection, id = %doc.id, "document appended");
        Ok(doc)
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        let state = self.lock();
        Ok(ordered(state.collections.get(collection)))
    }

    fn watch(&self, path: &str) -> DocWatch {
        let mut state = self.lock();
        let current = state.docs.get(path).cloned();
        state
            .doc_watchers
            .entry(path.to_string())
            .or_insert_with(|| watch::channel(current).0)
            .subscribe()
    }

    fn watch_collection(&self, collection: &str) -> ListWatch {
        let mut state = self.lock();
        let current = ordered(state.collections.get(collection));
        state
            .list_watchers
            .entry(collection.to_string())
            .or_insert_with(|| watch::channel(current).0)
            .subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    use crate::clock::ManualClock;

    fn manual_clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_create_if_absent_only_creates_once() {
        let backend = MemoryBackend::new();

        let first = backend
            .create_if_absent("rooms/r1", Patch::new().set("owner", json!("u1")))
            .await
            .unwrap();
        let second = backend
            .create_if_absent("rooms/r1", Patch::new().set("owner", json!("u2")))
            .await
            .unwrap();

        assert!(first);
        assert!(!second);

        // The loser's fields never landed.
        let doc = backend.get("rooms/r1").await.unwrap().unwrap();
        assert_eq!(doc.fields["owner"], json!("u1"));
    }

    #[tokio::test]
    async fn test_concurrent_creates_converge() {
        let backend = Arc::new(MemoryBackend::new());

        let a = {
            let backend = backend.clone();
            tokio::spawn(async move {
                backend
                    .create_if_absent("rooms/r1", Patch::new().set("from", json!("a")))
                    .await
                    .unwrap()
            })
        };
        let b = {
            let backend = backend.clone();
            tokio::spawn(async move {
                backend
                    .create_if_absent("rooms/r1", Patch::new().set("from", json!("b")))
                    .await
                    .unwrap()
            })
        };

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert!(a ^ b, "exactly one create must win");
        assert!(backend.get("rooms/r1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_merge_touches_only_named_fields() {
        let backend = MemoryBackend::new();

        backend
            .create_if_absent(
                "rooms/r1",
                Patch::new()
                    .set("isExtended", json!("undecided"))
                    .set("participants", json!(["u1", "u2"])),
            )
            .await
            .unwrap();

        backend
            .merge("rooms/r1", Patch::new().set("isExtended", json!("extended")))
            .await
            .unwrap();

        let doc = backend.get("rooms/r1").await.unwrap().unwrap();
        assert_eq!(doc.fields["isExtended"], json!("extended"));
        assert_eq!(doc.fields["participants"], json!(["u1", "u2"]));
    }

    #[tokio::test]
    async fn test_watch_starts_with_current_value() {
        let backend = MemoryBackend::new();
        backend
            .merge("users/u1/activeRoom/current", Patch::new().set("roomId", json!("r1")))
            .await
            .unwrap();

        // Subscription established after the write still observes it.
        let rx = backend.watch("users/u1/activeRoom/current");
        let current = rx.borrow().clone();
        assert_eq!(current.unwrap().fields["roomId"], json!("r1"));
    }

    #[tokio::test]
    async fn test_watch_observes_deletion() {
        let backend = MemoryBackend::new();
        backend
            .merge("users/u1/activeRoom/current", Patch::new().set("roomId", json!("r1")))
            .await
            .unwrap();

        let mut rx = backend.watch("users/u1/activeRoom/current");
        backend.delete("users/u1/activeRoom/current").await.unwrap();

        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let backend = MemoryBackend::new();
        backend.delete("users/u1/activeRoom/current").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_orders_by_timestamp_then_insertion() {
        let clock = manual_clock();
        let backend = MemoryBackend::with_clock(clock.clone());

        // Two appends at the same instant, one later.
        backend
            .add("rooms/r1/messages", Patch::new().set("text", json!("first")))
            .await
            .unwrap();
        backend
            .add("rooms/r1/messages", Patch::new().set("text", json!("second")))
            .await
            .unwrap();
        clock.advance(Duration::seconds(5));
        backend
            .add("rooms/r1/messages", Patch::new().set("text", json!("third")))
            .await
            .unwrap();

        let texts: Vec<_> = backend
            .list("rooms/r1/messages")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.fields["text"].clone())
            .collect();
        assert_eq!(texts, vec![json!("first"), json!("second"), json!("third")]);
    }

    #[tokio::test]
    async fn test_server_timestamp_comes_from_backend_clock() {
        let clock = manual_clock();
        let backend = MemoryBackend::with_clock(clock.clone());

        let doc = backend
            .add("rooms/r1/messages", Patch::new().server_timestamp("createdAt"))
            .await
            .unwrap();

        let stamped: chrono::DateTime<Utc> =
            serde_json::from_value(doc.fields["createdAt"].clone()).unwrap();
        assert_eq!(stamped, clock.now());
        assert_eq!(doc.created_at, clock.now());
    }
}
