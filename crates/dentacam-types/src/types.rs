//! Core types for the capture-pairing protocol.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use uuid::Uuid;

/// Identifier for one connected channel participant.
///
/// A `ConnectionId` is allocated by the transport layer when a client
/// connects and is the only thing the pairing subsystem is allowed to keep
/// after that client disconnects. It is deliberately opaque: nothing about
/// the participant (device, controller, observer) can be derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Allocate a fresh connection identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID (useful for reproducible tests).
    #[must_use]
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Pairing status of the capture device, as seen by every observer.
///
/// The status is always derived from the occupancy of the authorized slot
/// and the waiting room; it is never stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PairingStatus {
    /// No device is paired and none is waiting for authorization.
    Disconnected,
    /// At least one device has registered and awaits authorization.
    Waiting,
    /// A device is paired and ready to receive capture commands.
    Connected,
}

impl fmt::Display for PairingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PairingStatus::Disconnected => "DISCONNECTED",
            PairingStatus::Waiting => "WAITING",
            PairingStatus::Connected => "CONNECTED",
        };
        f.write_str(s)
    }
}

/// Identity of the authenticated caller that triggered a capture.
///
/// Produced by the external credential-verification capability; the gateway
/// never mints or inspects these itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A one-shot capture instruction for the paired device.
///
/// Constructed per dispatch and sent at-most-once; never persisted. The
/// `token` is the caller's raw bearer credential, forwarded verbatim so the
/// device can upload the snapshot on the caller's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureCommand {
    /// The authenticated user the capture belongs to.
    pub user_id: UserId,
    /// Forwarded credential for the device's subsequent upload.
    pub token: String,
}

impl CaptureCommand {
    /// Build a capture command for the given caller.
    #[must_use]
    pub fn new(user_id: impl Into<UserId>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_ids_are_unique() {
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn connection_id_display_matches_uuid() {
        let raw = Uuid::new_v4();
        let id = ConnectionId::from_uuid(raw);
        assert_eq!(id.to_string(), raw.to_string());
    }

    #[test]
    fn pairing_status_display() {
        assert_eq!(PairingStatus::Disconnected.to_string(), "DISCONNECTED");
        assert_eq!(PairingStatus::Waiting.to_string(), "WAITING");
        assert_eq!(PairingStatus::Connected.to_string(), "CONNECTED");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn pairing_status_serializes_to_wire_names() {
        assert_eq!(
            serde_json::to_string(&PairingStatus::Waiting).unwrap(),
            "\"WAITING\""
        );
        let parsed: PairingStatus = serde_json::from_str("\"CONNECTED\"").unwrap();
        assert_eq!(parsed, PairingStatus::Connected);
    }

    #[test]
    fn user_id_from_str() {
        let id: UserId = "user-1".into();
        assert_eq!(id.to_string(), "user-1");
    }
}
