//! Shared types for the dentacam capture-pairing gateway.
//!
//! This crate provides the types shared by the pairing core
//! (dentacam-core) and the gateway service (dentacam-service):
//!
//! - Connection identifiers and the derived pairing status
//! - Wire messages for the multiplexed event channel
//! - The pairing error taxonomy
//!
//! # Example
//!
//! ```
//! use dentacam_types::{PairingStatus, ServerEvent};
//!
//! let frame = ServerEvent::status(PairingStatus::Waiting);
//! assert_eq!(
//!     serde_json::to_string(&frame).unwrap(),
//!     r#"{"event":"PI_STATUS_UPDATE","status":"WAITING"}"#
//! );
//! ```

pub mod error;
pub mod protocol;
pub mod types;

pub use error::{PairingError, PairingResult};
pub use protocol::{ClientEvent, ServerEvent};
pub use types::{CaptureCommand, ConnectionId, PairingStatus, UserId};
