//! Per-inviter pairing mailbox.
//!
//! The joiner writes the mailbox as the final step of pairing; the
//! inviter's waiting screen subscribes to it and navigates into the chat as
//! soon as an entry appears. Delivery is last-write-wins per mailbox.

use std::sync::Arc;

use tracing::{debug, warn};

use pairlink_shared::UserId;
use pairlink_sync::SyncBackend;

use crate::paths;
use crate::watch::MailboxWatch;

/// Repository for pairing mailboxes.
pub struct PairingNotifier<S> {
    backend: Arc<S>,
}

impl<S> Clone for PairingNotifier<S> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
        }
    }
}

impl<S: SyncBackend> PairingNotifier<S> {
    pub fn new(backend: Arc<S>) -> Self {
        Self { backend }
    }

    /// Subscribe to `user_id`'s mailbox. The watch starts with the current
    /// entry, so a pairing that completed before the subscription is still
    /// delivered, and observes every later write and deletion.
    pub fn subscribe(&self, user_id: &UserId) -> MailboxWatch {
        MailboxWatch::new(self.backend.watch(&paths::mailbox_doc(user_id)))
    }

    /// Best-effort delete of the mailbox entry after consumption. Failures
    /// are swallowed: a stale entry is harmless and overwritten by the next
    /// pairing.
    pub async fn clear(&self, user_id: &UserId) {
        match self.backend.delete(&paths::mailbox_doc(user_id)).await {
            Ok(()) => debug!(user = %user_id, "mailbox cleared"),
            Err(e) => warn!(user = %user_id, error = %e, "failed to clear mailbox"),
        }
    }
}
