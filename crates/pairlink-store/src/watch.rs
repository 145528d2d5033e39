//! Typed live views over backend watches.
//!
//! Each watch starts with the current value and observes every later
//! change. Dropping the watch is the unsubscribe; `changed` returns `false`
//! once the backend has gone away.

use pairlink_shared::{MailboxEntry, Message, Room};
use pairlink_sync::{DocWatch, ListWatch};

use crate::codec;
use crate::error::Result;

/// Live view of one room document.
pub struct RoomWatch {
    rx: DocWatch,
}

impl RoomWatch {
    pub(crate) fn new(rx: DocWatch) -> Self {
        Self { rx }
    }

    /// Decode the latest observed state of the room.
    pub fn current(&self) -> Result<Option<Room>> {
        self.rx.borrow().as_ref().map(codec::decode).transpose()
    }

    /// Wait for the next change to the room document.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

/// Live view of one user's pairing mailbox.
pub struct MailboxWatch {
    rx: DocWatch,
}

impl MailboxWatch {
    pub(crate) fn new(rx: DocWatch) -> Self {
        Self { rx }
    }

    /// Decode the latest observed entry; `None` when the mailbox is empty
    /// or cleared.
    pub fn current(&self) -> Result<Option<MailboxEntry>> {
        self.rx.borrow().as_ref().map(codec::decode).transpose()
    }

    /// Wait for the next write or deletion.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

/// Live view of a room's full ordered message list. Each observation is the
/// authoritative complete state, never an incremental patch.
pub struct MessageWatch {
    rx: ListWatch,
}

impl MessageWatch {
    pub(crate) fn new(rx: ListWatch) -> Self {
        Self { rx }
    }

    /// Decode the latest observed list, ascending by server timestamp with
    /// insertion order as tie-break.
    pub fn current(&self) -> Result<Vec<Message>> {
        self.rx.borrow().iter().map(codec::decode_with_id).collect()
    }

    /// Wait for the next append.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
