//! Append-only, time-ordered message log per room.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use pairlink_shared::{Identity, Message, RoomId};
use pairlink_sync::{Patch, SyncBackend};

use crate::codec;
use crate::error::{Result, StoreError};
use crate::paths;
use crate::watch::MessageWatch;

/// Repository for room message logs.
pub struct MessageChannel<S> {
    backend: Arc<S>,
}

impl<S> Clone for MessageChannel<S> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
        }
    }
}

impl<S: SyncBackend> MessageChannel<S> {
    pub fn new(backend: Arc<S>) -> Self {
        Self { backend }
    }

    /// Append a message and refresh the room's denormalized metadata.
    ///
    /// The text is trimmed before storing; a message that trims to nothing
    /// is rejected without touching the store. The append is not safe to
    /// blindly retry after an ambiguous failure (a duplicate could land);
    /// surface the failure instead.
    pub async fn send(&self, room_id: &RoomId, sender: &Identity, text: &str) -> Result<Message> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::EmptyMessage);
        }
        if !sender.is_complete() {
            return Err(StoreError::InvalidIdentity);
        }

        let patch = Patch::new()
            .set("text", json!(text))
            .set("sender", codec::to_value(sender)?)
            .server_timestamp("createdAt");
        let doc = self
            .backend
            .add(&paths::room_messages(room_id), patch)
            .await?;
        let message: Message = codec::decode_with_id(&doc)?;

        // Denormalize onto the room document; `at` mirrors the message's
        // own server timestamp.
        let summary = Patch::new().server_timestamp("updatedAt").set(
            "lastMessage",
            json!({
                "text": message.text,
                "senderId": message.sender.user_id,
                "at": message.created_at,
            }),
        );
        self.backend
            .merge(&paths::room_doc(room_id), summary)
            .await?;

        debug!(room = %room_id, id = %message.id, "message sent");
        Ok(message)
    }

    /// Live view of the room's full ordered message list.
    pub fn subscribe(&self, room_id: &RoomId) -> MessageWatch {
        MessageWatch::new(self.backend.watch_collection(&paths::room_messages(room_id)))
    }

    /// One-shot ordered read of the message log.
    pub async fn list(&self, room_id: &RoomId) -> Result<Vec<Message>> {
        let docs = self.backend.list(&paths::room_messages(room_id)).await?;
        docs.iter().map(codec::decode_with_id).collect()
    }
}
