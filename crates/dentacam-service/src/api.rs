//! HTTP endpoints for the dentacam gateway.
//!
//! # Endpoints
//!
//! - `GET /api/health` - service health, no auth
//! - `GET /api/pairing` - current pairing status snapshot, no auth
//! - `POST /api/capture` - trigger a capture on the paired device;
//!   requires a bearer credential when auth is enabled
//!
//! # Error Handling
//!
//! All endpoints return structured JSON errors via [`AppError`]
//! (`{"error": message}` bodies). A capture with no paired device maps to
//! HTTP 503 so clients can treat it as retryable; authentication failures
//! map to 401.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use time::OffsetDateTime;

use dentacam_types::{CaptureCommand, PairingError, PairingStatus};

use crate::auth::{AuthError, extract_credential};
use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/pairing", get(pairing_status))
        .route("/api/capture", post(trigger_capture))
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: OffsetDateTime::now_utc(),
    })
}

/// Pairing status response.
#[derive(Debug, Serialize)]
pub struct PairingResponse {
    /// The current pairing status.
    pub status: PairingStatus,
}

/// Current pairing status snapshot.
///
/// The same information every channel observer receives as
/// `PI_STATUS_UPDATE`, for clients that only poll.
async fn pairing_status(State(state): State<Arc<AppState>>) -> Json<PairingResponse> {
    Json(PairingResponse {
        status: state.coordinator.status().await,
    })
}

/// Capture acknowledgement body.
#[derive(Debug, Serialize)]
pub struct CaptureResponse {
    pub msg: &'static str,
}

/// Trigger a capture on the paired device.
///
/// Verifies the caller's bearer credential via the configured capability,
/// then relays a capture command carrying the caller's identity and the
/// raw credential (the device uploads the snapshot with it). Dispatch is
/// fire-and-forget: 200 means the command was queued for the device, not
/// that the capture completed.
async fn trigger_capture(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<CaptureResponse>, AppError> {
    let auth_enabled = state.config.read().await.security.auth_enabled;
    let (raw, bare) = match extract_credential(&headers) {
        Some(credential) => credential,
        None if auth_enabled => return Err(AuthError::MissingCredential.into()),
        // Auth disabled and no header: nothing to verify or forward.
        None => ("", ""),
    };

    let user_id = state.verifier.verify(bare)?;
    state
        .coordinator
        .dispatch_capture(CaptureCommand::new(user_id, raw))
        .await?;

    Ok(Json(CaptureResponse {
        msg: "Capture command sent to device.",
    }))
}

/// Application-level HTTP errors.
#[derive(Debug)]
pub enum AppError {
    /// Credential missing or invalid (401).
    Unauthorized(String),
    /// The capture device is offline (503, retryable).
    DeviceOffline(String),
    /// Anything unexpected (500).
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Unauthorized(e.to_string())
    }
}

impl From<PairingError> for AppError {
    fn from(e: PairingError) -> Self {
        match e {
            PairingError::DeviceOffline => AppError::DeviceOffline(e.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::DeviceOffline(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}
