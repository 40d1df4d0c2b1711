//! Realtime gateway coordinating the dentacam capture device.
//!
//! This crate provides the gateway service that:
//! - Hosts the multiplexed event channel for devices, controllers, and
//!   observers (WebSocket)
//! - Runs the pairing protocol: one capture device registers, waits, and
//!   is authorized by a controller
//! - Relays authenticated capture commands to the paired device
//! - Broadcasts pairing status to every connected observer
//!
//! # Endpoints
//!
//! - `GET /api/health` - Service health check (no auth required)
//! - `GET /api/pairing` - Current pairing status snapshot
//! - `POST /api/capture` - Trigger a capture on the paired device
//! - `WS /api/ws` - The bidirectional event channel
//!
//! # Channel protocol
//!
//! | Direction | Event | Meaning |
//! |-----------|-------|---------|
//! | in | `register-pi` | device enters the waiting room |
//! | in | `ui-authorize-pi` | controller promotes one waiting device |
//! | out | `PI_STATUS_UPDATE` | status broadcast / join snapshot |
//! | out | `COMMAND_CAPTURE` | capture instruction, device only |
//! | out | `error` | targeted failure notice |
//!
//! # Configuration
//!
//! The service reads a TOML configuration file:
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:8080"
//! broadcast_buffer = 100
//!
//! [security]
//! # Require a bearer credential on POST /api/capture
//! auth_enabled = true
//! api_token = "your-secure-random-key-at-least-16-chars"
//! user_id = "operator"
//! ```
//!
//! Credential verification is a pluggable capability
//! ([`auth::CredentialVerifier`]); the built-in static-token verifier
//! covers single-operator deployments.

pub mod api;
pub mod auth;
pub mod config;
pub mod state;
pub mod ws;

pub use auth::{AuthError, CredentialVerifier, PermissiveVerifier, StaticTokenVerifier};
pub use config::{Config, ConfigError, SecurityConfig, ServerConfig, ValidationError};
pub use state::AppState;
