//! Document paths under the sync service.
//!
//! Rooms live at `rooms/{roomId}`, their messages in the
//! `rooms/{roomId}/messages` collection, and each user's pairing mailbox at
//! `users/{userId}/activeRoom/current`.

use pairlink_shared::{RoomId, UserId};

pub fn room_doc(room_id: &RoomId) -> String {
    format!("rooms/{room_id}")
}

pub fn room_messages(room_id: &RoomId) -> String {
    format!("rooms/{room_id}/messages")
}

pub fn mailbox_doc(user_id: &UserId) -> String {
    format!("users/{user_id}/activeRoom/current")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let room_id = RoomId::from("u1_u2");
        assert_eq!(room_doc(&room_id), "rooms/u1_u2");
        assert_eq!(room_messages(&room_id), "rooms/u1_u2/messages");
        assert_eq!(
            mailbox_doc(&UserId::from("u1")),
            "users/u1/activeRoom/current"
        );
    }
}
