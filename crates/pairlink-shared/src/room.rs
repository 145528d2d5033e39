//! Domain models of the pairing protocol.
//!
//! Every struct derives `Serialize`/`Deserialize` in the camelCase wire form
//! the sync service stores, so the store layer can move them in and out of
//! documents without hand-written mappings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Identity, RoomId, UserId};

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// Whether the decision-maker has extended the room past its expiry window.
/// Starts undecided; moves to extended at most once and never reverts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Extension {
    #[default]
    Undecided,
    Extended,
}

/// Denormalized cache of the newest message, kept on the room document for
/// list views. Derived data, never authoritative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub text: String,
    pub sender_id: UserId,
    pub at: DateTime<Utc>,
}

/// A persisted 1:1 pairing.
///
/// `participants[0]` is the original inviter and sole decision-maker of the
/// access gate. Timestamps are server-assigned; a live view can observe the
/// document before they resolve, hence the `Option`s.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub room_id: RoomId,
    pub participants: [Identity; 2],
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_extended: Extension,
    #[serde(default)]
    pub last_message: Option<LastMessage>,
}

impl Room {
    /// The participant who may extend an expiring room.
    pub fn decision_maker(&self) -> &Identity {
        &self.participants[0]
    }

    /// The participant on the other side of the pairing from `user_id`.
    pub fn counterpart(&self, user_id: &UserId) -> Option<&Identity> {
        self.participants.iter().find(|p| &p.user_id != user_id)
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single chat message. Append-only: never edited or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Store-assigned id, unique within the room.
    pub id: String,
    pub text: String,
    /// Sender identity snapshot at send time.
    pub sender: Identity,
    /// Server-assigned; defines the total order within the room, with store
    /// insertion order as tie-break.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Pairing mailbox
// ---------------------------------------------------------------------------

/// Ephemeral per-inviter pointer written by the joiner once a room is
/// formed, so the inviter's waiting screen can discover the pairing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MailboxEntry {
    pub room_id: RoomId,
    pub other: Identity,
    pub at: DateTime<Utc>,
}
