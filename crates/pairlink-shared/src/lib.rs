//! # pairlink-shared
//!
//! Domain types and pure protocol logic shared by every Pairlink crate:
//! participant identities, the canonical room-id derivation, and the
//! time-boxed room access gate.

pub mod gate;
pub mod room;
pub mod types;

pub use gate::GateState;
pub use room::{Extension, LastMessage, MailboxEntry, Message, Room};
pub use types::{Identity, RoomId, UserId, ROOM_ID_SEPARATOR};
