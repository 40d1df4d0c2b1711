//! Error taxonomy for the pairing core.

use thiserror::Error;

/// Errors that can occur while coordinating the capture device.
///
/// All pairing errors are local and non-fatal: they resolve to a targeted
/// error message for one client or an HTTP failure for one caller, never a
/// crash. A disconnect referencing an unknown handle is not an error at
/// all; it is handled as an idempotent no-op.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error
/// variants in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PairingError {
    /// A capture was requested while no device occupies the authorized
    /// slot. Retryable once a device pairs again.
    #[error("capture device is currently offline")]
    DeviceOffline,

    /// A controller asked to authorize a device while the waiting room was
    /// empty. Surfaced only to that controller, never broadcast.
    #[error("no capture device found in the waiting room")]
    NoWaitingDevice,
}

/// Result type alias using [`PairingError`].
pub type PairingResult<T> = std::result::Result<T, PairingError>;
