//! Room lifecycle: idempotent create-or-touch, activity touches, and the
//! one-way extension flag.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use pairlink_shared::{Extension, Identity, Room, RoomId};
use pairlink_sync::{Patch, SyncBackend};

use crate::codec;
use crate::error::{Result, StoreError};
use crate::paths;
use crate::watch::RoomWatch;

/// Repository for room documents.
pub struct RoomStore<S> {
    backend: Arc<S>,
}

impl<S> Clone for RoomStore<S> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
        }
    }
}

impl<S: SyncBackend> RoomStore<S> {
    pub fn new(backend: Arc<S>) -> Self {
        Self { backend }
    }

    /// Ensure the 1:1 room between `inviter` and `joiner` exists, then
    /// point the inviter's mailbox at it.
    ///
    /// Creation is a single conditional write, so two devices scanning
    /// near-simultaneously converge on one room document. An existing room
    /// only gets its `updatedAt` touched; `participants`, `isExtended` and
    /// `createdAt` are never overwritten. The mailbox is (re)written on
    /// every call: it is what wakes the inviter's waiting screen.
    pub async fn get_or_create_room(
        &self,
        inviter: &Identity,
        joiner: &Identity,
    ) -> Result<RoomId> {
        if !inviter.is_complete() || !joiner.is_complete() {
            return Err(StoreError::InvalidIdentity);
        }

        let room_id = RoomId::for_pair(&inviter.user_id, &joiner.user_id);
        let path = paths::room_doc(&room_id);

        let patch = Patch::new()
            .set("roomId", codec::to_value(&room_id)?)
            .set("participants", codec::to_value(&[inviter, joiner])?)
            .set("isExtended", codec::to_value(&Extension::Undecided)?)
            .set("lastMessage", Value::Null)
            .server_timestamp("createdAt")
            .server_timestamp("updatedAt");

        let created = self.backend.create_if_absent(&path, patch).await?;
        if created {
            info!(room = %room_id, "room created");
        } else {
            // Touch so list views re-sort on renewed activity.
            self.backend
                .merge(&path, Patch::new().server_timestamp("updatedAt"))
                .await?;
            debug!(room = %room_id, "room reused");
        }

        let mailbox = Patch::new()
            .set("roomId", codec::to_value(&room_id)?)
            .set("other", codec::to_value(joiner)?)
            .server_timestamp("at");
        self.backend
            .merge(&paths::mailbox_doc(&inviter.user_id), mailbox)
            .await?;

        Ok(room_id)
    }

    /// Refresh the room's activity timestamp.
    pub async fn touch_activity(&self, room_id: &RoomId) -> Result<()> {
        self.backend
            .merge(
                &paths::room_doc(room_id),
                Patch::new().server_timestamp("updatedAt"),
            )
            .await?;
        Ok(())
    }

    /// Mark the room extended. One-way and idempotent: extending an already
    /// extended room changes nothing.
    pub async fn set_extended(&self, room_id: &RoomId) -> Result<()> {
        let path = paths::room_doc(room_id);
        if self.backend.get(&path).await?.is_none() {
            return Err(StoreError::RoomNotFound(room_id.clone()));
        }

        let patch = Patch::new()
            .set("isExtended", codec::to_value(&Extension::Extended)?)
            .server_timestamp("updatedAt");
        self.backend.merge(&path, patch).await?;

        info!(room = %room_id, "room extended");
        Ok(())
    }

    /// Fetch the room once.
    pub async fn get_room(&self, room_id: &RoomId) -> Result<Option<Room>> {
        match self.backend.get(&paths::room_doc(room_id)).await? {
            Some(doc) => Ok(Some(codec::decode(&doc)?)),
            None => Ok(None),
        }
    }

    /// Live view of the room document, starting from its current state.
    pub fn watch_room(&self, room_id: &RoomId) -> RoomWatch {
        RoomWatch::new(self.backend.watch(&paths::room_doc(room_id)))
    }
}
