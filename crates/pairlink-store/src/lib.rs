//! # pairlink-store
//!
//! Room lifecycle, pairing mailbox, and message log repositories over the
//! sync backend. Every repository holds an injected backend handle; nothing
//! here is a singleton, so the whole protocol runs against the in-memory
//! backend in tests.

pub mod mailbox;
pub mod messages;
pub mod paths;
pub mod rooms;
pub mod watch;

mod codec;
mod error;

pub use error::{Result, StoreError};
pub use mailbox::PairingNotifier;
pub use messages::MessageChannel;
pub use rooms::RoomStore;
pub use watch::{MailboxWatch, MessageWatch, RoomWatch};
