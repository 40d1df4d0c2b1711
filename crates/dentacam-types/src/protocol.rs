//! Wire messages exchanged over the multiplexed event channel.
//!
//! Every client (device, controller, observer) shares one bidirectional
//! JSON channel. Frames are tagged with an `event` field; the names below
//! are the protocol and must not change without a coordinated client
//! rollout.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{CaptureCommand, PairingStatus};

/// Messages a client may send to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event"))]
pub enum ClientEvent {
    /// A capture device announces availability and enters the waiting room.
    #[cfg_attr(feature = "serde", serde(rename = "register-pi"))]
    RegisterPi,
    /// A controller asks the gateway to promote one waiting device.
    #[cfg_attr(feature = "serde", serde(rename = "ui-authorize-pi"))]
    UiAuthorizePi,
}

/// Messages the gateway may send to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event"))]
pub enum ServerEvent {
    /// Pairing status change, broadcast to every observer and unicast to
    /// each newly joined one.
    #[cfg_attr(feature = "serde", serde(rename = "PI_STATUS_UPDATE"))]
    PiStatusUpdate {
        /// The current pairing status.
        status: PairingStatus,
    },
    /// Capture instruction, sent only to the authorized device.
    #[cfg_attr(feature = "serde", serde(rename = "COMMAND_CAPTURE"))]
    CommandCapture {
        /// The user the capture belongs to.
        #[cfg_attr(feature = "serde", serde(rename = "userId"))]
        user_id: String,
        /// Forwarded credential for the device's upload.
        token: String,
    },
    /// Targeted failure notice, sent only to the client whose request
    /// could not be satisfied.
    #[cfg_attr(feature = "serde", serde(rename = "error"))]
    Error {
        /// Human-readable description of the failure.
        message: String,
    },
}

impl ServerEvent {
    /// Build a status-update frame.
    #[must_use]
    pub fn status(status: PairingStatus) -> Self {
        Self::PiStatusUpdate { status }
    }

    /// Build a capture-command frame from a [`CaptureCommand`].
    #[must_use]
    pub fn capture(cmd: CaptureCommand) -> Self {
        Self::CommandCapture {
            user_id: cmd.user_id.0,
            token: cmd.token,
        }
    }

    /// Build a targeted error frame.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn register_pi_wire_name() {
        let json = serde_json::to_string(&ClientEvent::RegisterPi).unwrap();
        assert_eq!(json, r#"{"event":"register-pi"}"#);
    }

    #[test]
    fn ui_authorize_pi_wire_name() {
        let parsed: ClientEvent =
            serde_json::from_str(r#"{"event":"ui-authorize-pi"}"#).unwrap();
        assert_eq!(parsed, ClientEvent::UiAuthorizePi);
    }

    #[test]
    fn unknown_client_event_fails_to_parse() {
        let result = serde_json::from_str::<ClientEvent>(r#"{"event":"pi-disconnect"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn status_update_frame_shape() {
        let frame = ServerEvent::status(PairingStatus::Waiting);
        let json = serde_json::to_string(&frame).unwrap();
        assert_eq!(json, r#"{"event":"PI_STATUS_UPDATE","status":"WAITING"}"#);
    }

    #[test]
    fn capture_command_uses_camel_case_user_id() {
        let frame = ServerEvent::capture(CaptureCommand::new("user-7", "Bearer abc"));
        let json = serde_json::to_string(&frame).unwrap();
        assert_eq!(
            json,
            r#"{"event":"COMMAND_CAPTURE","userId":"user-7","token":"Bearer abc"}"#
        );
    }

    #[test]
    fn error_frame_shape() {
        let frame = ServerEvent::error("no device");
        let json = serde_json::to_string(&frame).unwrap();
        assert_eq!(json, r#"{"event":"error","message":"no device"}"#);
    }

    #[test]
    fn server_event_round_trip() {
        let frame = ServerEvent::status(PairingStatus::Connected);
        let json = serde_json::to_string(&frame).unwrap();
        let back: ServerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, frame);
    }
}
