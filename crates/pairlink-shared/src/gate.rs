//! Time-boxed room access control.
//!
//! Evaluated against the room document every time a participant looks at a
//! room, and re-evaluated on every document change, so an extension
//! performed on one device unlocks the other without a reload.

use chrono::{DateTime, Duration, Utc};

use crate::room::{Extension, Room};
use crate::types::{Identity, UserId};

/// Gate verdict for one viewer at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Messaging allowed.
    Open,
    /// The room expired undecided and the viewer is the decision-maker:
    /// they must extend or decline.
    AwaitingDecision,
    /// The room expired undecided and the viewer is not the decision-maker.
    /// Carries the identity to name on the lock screen.
    Locked { decision_maker: Identity },
}

impl GateState {
    pub fn allows_sending(&self) -> bool {
        matches!(self, GateState::Open)
    }
}

/// Evaluate the gate for `viewer`.
///
/// A room without a resolved `createdAt` is treated as open: the timestamp
/// is server-assigned and can lag the first snapshot of a brand-new room.
pub fn evaluate(
    room: &Room,
    viewer: &UserId,
    now: DateTime<Utc>,
    expiry: Duration,
) -> GateState {
    let Some(created_at) = room.created_at else {
        return GateState::Open;
    };

    if room.is_extended == Extension::Extended || now - created_at < expiry {
        return GateState::Open;
    }

    if &room.decision_maker().user_id == viewer {
        GateState::AwaitingDecision
    } else {
        GateState::Locked {
            decision_maker: room.decision_maker().clone(),
        }
    }
}
