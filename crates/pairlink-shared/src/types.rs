use serde::{Deserialize, Serialize};

/// Separator joining two user ids into a room id. User ids are random
/// opaque tokens assigned by the identity provider, so the separator can
/// never occur inside one.
pub const ROOM_ID_SEPARATOR: char = '_';

/// Opaque stable user identifier, assigned once per device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A participant: stable id plus the display name chosen at onboarding.
///
/// Identities are snapshots. A room keeps the identities captured at
/// creation time and a message the one captured at send time; a later
/// rename rewrites neither.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: UserId(user_id.into()),
            username: username.into(),
        }
    }

    /// Whether both fields carry a usable value. Operations taking an
    /// identity reject incomplete ones up front.
    pub fn is_complete(&self) -> bool {
        !self.user_id.0.trim().is_empty() && !self.username.trim().is_empty()
    }
}

/// Canonical identifier of a 1:1 room. Doubles as the idempotency token for
/// room creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Derive the room id for an unordered pair of participants.
    ///
    /// Sorts the two ids lexicographically and joins them with
    /// [`ROOM_ID_SEPARATOR`], so `for_pair(a, b) == for_pair(b, a)` and the
    /// same pair always converges on the same room document. Pure: consults
    /// neither clock nor network.
    pub fn for_pair(a: &UserId, b: &UserId) -> Self {
        let (lo, hi) = if a.0 <= b.0 { (a, b) } else { (b, a) };
        Self(format!("{}{}{}", lo.0, ROOM_ID_SEPARATOR, hi.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_commutative() {
        let a = UserId::from("u1");
        let b = UserId::from("u2");
        assert_eq!(RoomId::for_pair(&a, &b), RoomId::for_pair(&b, &a));
    }

    #[test]
    fn test_room_id_sorted_join() {
        let a = UserId::from("zeta");
        let b = UserId::from("alpha");
        assert_eq!(RoomId::for_pair(&a, &b).as_str(), "alpha_zeta");
    }

    #[test]
    fn test_room_id_deterministic() {
        let a = UserId::from("u1");
        let b = UserId::from("u2");
        assert_eq!(RoomId::for_pair(&a, &b), RoomId::for_pair(&a, &b));
    }

    #[test]
    fn test_identity_completeness() {
        assert!(Identity::new("u1", "Alice").is_complete());
        assert!(!Identity::new("", "Alice").is_complete());
        assert!(!Identity::new("u1", "   ").is_complete());
    }
}
