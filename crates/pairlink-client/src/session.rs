//! A participant's live view of one room: reactive access gate, message
//! subscription, and the local-notification side effect.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use pairlink_shared::gate::{self, GateState};
use pairlink_shared::{Identity, Message, RoomId};
use pairlink_store::{MessageChannel, MessageWatch, RoomStore, RoomWatch, StoreError};
use pairlink_sync::{Clock, SyncBackend, SystemClock};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Receiver of fire-and-forget local notifications. Implemented by the host
/// platform shell; must never block.
pub trait Notify: Send + Sync + 'static {
    fn notify(&self, title: &str, body: &str);
}

/// RAII handle for a background subscription task. Dropping it cancels the
/// task, so callbacks stop when the owning screen goes away.
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// One participant's session in one room.
pub struct ChatSession<S> {
    rooms: RoomStore<S>,
    channel: MessageChannel<S>,
    room_id: RoomId,
    viewer: Identity,
    config: ClientConfig,
    clock: Arc<dyn Clock>,
    room: RoomWatch,
    /// Set when the decision-maker declines to extend. Local only: never
    /// persisted, so reopening the room prompts the decision-maker again
    /// while the other participant stays locked until a real extension.
    declined: bool,
}

impl<S: SyncBackend> ChatSession<S> {
    /// Open a session on `room_id`, failing with `RoomNotFound` if the
    /// room does not exist.
    pub async fn open(
        rooms: RoomStore<S>,
        channel: MessageChannel<S>,
        room_id: RoomId,
        viewer: Identity,
        config: ClientConfig,
    ) -> Result<Self> {
        Self::open_with_clock(rooms, channel, room_id, viewer, config, Arc::new(SystemClock))
            .await
    }

    /// Open with an explicit clock for gate evaluation.
    pub async fn open_with_clock(
        rooms: RoomStore<S>,
        channel: MessageChannel<S>,
        room_id: RoomId,
        viewer: Identity,
        config: ClientConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        if rooms.get_room(&room_id).await?.is_none() {
            return Err(StoreError::RoomNotFound(room_id).into());
        }
        let room = rooms.watch_room(&room_id);

        info!(room = %room_id, viewer = %viewer.user_id, "session opened");
        Ok(Self {
            rooms,
            channel,
            room_id,
            viewer,
            config,
            clock,
            room,
            declined: false,
        })
    }

    /// Evaluate the gate against the latest room document.
    ///
    /// Recomputed on every call, so an extension performed on the other
    /// device flips the state without reloading the screen.
    pub fn gate(&self) -> Result<GateState> {
        if self.declined {
            // The decision-maker locked this session themselves.
            return Ok(GateState::Locked {
                decision_maker: self.viewer.clone(),
            });
        }

        let Some(room) = self.room.current()? else {
            return Err(StoreError::RoomNotFound(self.room_id.clone()).into());
        };
        Ok(gate::evaluate(
            &room,
            &self.viewer.user_id,
            self.clock.now(),
            self.config.room_expiry,
        ))
    }

    /// Wait for the room document to change (extension, activity touch).
    pub async fn room_changed(&mut self) -> bool {
        self.room.changed().await
    }

    /// Extend the room. One-way and idempotent; also lifts a decline from
    /// earlier in this session.
    pub async fn extend(&mut self) -> Result<()> {
        self.rooms.set_extended(&self.room_id).await?;
        self.declined = false;
        Ok(())
    }

    /// Decline extending. Locks this session locally without persisting
    /// anything.
    pub fn decline(&mut self) {
        debug!(room = %self.room_id, "extension declined, session locked locally");
        self.declined = true;
    }

    /// Send a message. The gate is enforced here, on the sending device;
    /// the UI disables input while locked, so `GateClosed` is defensive.
    pub async fn send(&self, text: &str) -> Result<Message> {
        if !self.gate()?.allows_sending() {
            return Err(ClientError::GateClosed);
        }
        Ok(self.channel.send(&self.room_id, &self.viewer, text).await?)
    }

    /// Live view of the room's full ordered message list.
    pub fn subscribe_messages(&self) -> MessageWatch {
        self.channel.subscribe(&self.room_id)
    }

    /// The other participant, for headers and notification titles.
    pub fn counterpart(&self) -> Result<Option<Identity>> {
        Ok(self
            .room
            .current()?
            .and_then(|r| r.counterpart(&self.viewer.user_id).cloned()))
    }

    /// Spawn the local-notification side effect: whenever the newest
    /// message was sent by the other participant, fire a notification with
    /// their name and the text. Fire-and-forget; never blocks message
    /// delivery. The task stops when the returned handle is dropped.
    pub fn spawn_notifier(&self, notify: Arc<dyn Notify>) -> Subscription {
        let mut watch = self.subscribe_messages();
        let viewer = self.viewer.user_id.clone();

        let handle = tokio::spawn(async move {
            let mut last_seen: Option<String> = None;
            loop {
                if let Ok(messages) = watch.current() {
                    if let Some(latest) = messages.last() {
                        let incoming = latest.sender.user_id != viewer;
                        let fresh = last_seen.as_deref() != Some(latest.id.as_str());
                        if incoming && fresh {
                            notify.notify(&latest.sender.username, &latest.text);
                        }
                        last_seen = Some(latest.id.clone());
                    }
                }
                if !watch.changed().await {
                    break;
                }
            }
        });

        Subscription { handle }
    }
}
