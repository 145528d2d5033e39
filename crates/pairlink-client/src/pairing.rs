//! Both sides of the QR pairing exchange.
//!
//! The inviter shows a QR (see [`crate::qr::encode_join`]) and waits on
//! their mailbox; the joiner scans, establishes the room, and navigates
//! straight into the chat.

use tracing::info;

use pairlink_shared::{Identity, RoomId};
use pairlink_store::{PairingNotifier, RoomStore, StoreError};
use pairlink_sync::{SyncBackend, SyncError};

use crate::error::Result;
use crate::qr;

/// Outcome of a completed pairing, ready for navigation into the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedRoom {
    pub room_id: RoomId,
    pub me: Identity,
    pub other: Identity,
}

/// Joiner side: validate a scanned payload and establish (or reuse) the
/// room between the inviter it names and `me`.
pub async fn join_from_scan<S: SyncBackend>(
    rooms: &RoomStore<S>,
    scanned: &str,
    me: &Identity,
) -> Result<PairedRoom> {
    let inviter = qr::decode_join(scanned)?;
    let room_id = rooms.get_or_create_room(&inviter, me).await?;

    info!(room = %room_id, "joined room from scan");
    Ok(PairedRoom {
        room_id,
        me: me.clone(),
        other: inviter,
    })
}

/// Inviter side: wait until someone scans our QR and forms a room.
///
/// Resolves on the first mailbox entry, including one written before the
/// subscription was established, then clears the mailbox best-effort.
/// Cancel by dropping the future; that drops the subscription.
pub async fn wait_for_pairing<S: SyncBackend>(
    notifier: &PairingNotifier<S>,
    me: &Identity,
) -> Result<PairedRoom> {
    let mut mailbox = notifier.subscribe(&me.user_id);

    let entry = loop {
        if let Some(entry) = mailbox.current()? {
            break entry;
        }
        if !mailbox.changed().await {
            return Err(StoreError::Sync(SyncError::Unavailable(
                "mailbox subscription closed".to_string(),
            ))
            .into());
        }
    };

    notifier.clear(&me.user_id).await;
    info!(room = %entry.room_id, other = %entry.other.user_id, "pairing completed");

    Ok(PairedRoom {
        room_id: entry.room_id,
        me: me.clone(),
        other: entry.other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use pairlink_sync::MemoryBackend;

    use crate::error::ClientError;

    fn alice() -> Identity {
        Identity::new("u1", "Alice")
    }

    fn bob() -> Identity {
        Identity::new("u2", "Bob")
    }

    #[tokio::test]
    async fn test_join_from_scan_establishes_room() {
        let backend = Arc::new(MemoryBackend::new());
        let rooms = RoomStore::new(backend);

        let scanned = qr::encode_join(&alice());
        let paired = join_from_scan(&rooms, &scanned, &bob()).await.unwrap();

        assert_eq!(paired.room_id.as_str(), "u1_u2");
        assert_eq!(paired.other, alice());
        assert!(rooms.get_room(&paired.room_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_join_from_scan_rejects_bad_payload() {
        let backend = Arc::new(MemoryBackend::new());
        let rooms = RoomStore::new(backend);

        let result = join_from_scan(&rooms, "{\"type\":\"other\"}", &bob()).await;
        assert!(matches!(result, Err(ClientError::InvalidQrPayload)));
    }

    #[tokio::test]
    async fn test_inviter_wakes_on_pairing() {
        let backend = Arc::new(MemoryBackend::new());
        let rooms = RoomStore::new(backend.clone());
        let notifier = PairingNotifier::new(backend);

        // The inviter starts waiting before anyone scans.
        let waiting = {
            let notifier = notifier.clone();
            tokio::spawn(async move { wait_for_pairing(&notifier, &alice()).await })
        };

        let scanned = qr::encode_join(&alice());
        let joined = join_from_scan(&rooms, &scanned, &bob()).await.unwrap();

        let paired = waiting.await.unwrap().unwrap();
        assert_eq!(paired.room_id, joined.room_id);
        assert_eq!(paired.other, bob());

        // The mailbox was consumed.
        let mailbox = notifier.subscribe(&alice().user_id);
        assert!(mailbox.current().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_inviter_sees_pairing_that_already_happened() {
        let backend = Arc::new(MemoryBackend::new());
        let rooms = RoomStore::new(backend.clone());
        let notifier = PairingNotifier::new(backend);

        let scanned = qr::encode_join(&alice());
        join_from_scan(&rooms, &scanned, &bob()).await.unwrap();

        // Subscription established after the mailbox write still resolves
        // immediately.
        let paired = wait_for_pairing(&notifier, &alice()).await.unwrap();
        assert_eq!(paired.other, bob());
    }
}
