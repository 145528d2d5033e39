//! QR payload boundary.
//!
//! The inviter's QR encodes only their identity; no room exists until
//! someone scans. The scanning side validates the payload shape before any
//! store call, and re-arms the scanner when validation fails.

use serde::{Deserialize, Serialize};

use pairlink_shared::Identity;

use crate::error::{ClientError, Result};

const PAYLOAD_TYPE: &str = "joinRoom";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JoinPayload {
    #[serde(rename = "type")]
    kind: String,
    inviter: Identity,
}

/// Encode the payload the inviter's QR code displays.
pub fn encode_join(inviter: &Identity) -> String {
    let payload = JoinPayload {
        kind: PAYLOAD_TYPE.to_string(),
        inviter: inviter.clone(),
    };
    serde_json::to_string(&payload).expect("payload serialization")
}

/// Decode and validate a scanned payload into the inviter's identity.
pub fn decode_join(data: &str) -> Result<Identity> {
    let payload: JoinPayload =
        serde_json::from_str(data).map_err(|_| ClientError::InvalidQrPayload)?;

    if payload.kind != PAYLOAD_TYPE || !payload.inviter.is_complete() {
        return Err(ClientError::InvalidQrPayload);
    }

    Ok(payload.inviter)
}
