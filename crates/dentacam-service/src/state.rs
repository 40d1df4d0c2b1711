//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use dentacam_core::PairingCoordinator;

use crate::auth::{CredentialVerifier, verifier_from_config};
use crate::config::Config;

/// Shared application state.
///
/// One instance per process, built at startup and handed to every route
/// as `Arc<AppState>`. The pairing coordinator inside is the single owner
/// of all pairing state; tests build isolated `AppState`s freely.
pub struct AppState {
    /// The pairing coordinator (registry, waiting room, state machine,
    /// capture relay, status broadcast).
    pub coordinator: PairingCoordinator,
    /// Configuration (RwLock for runtime reads from handlers).
    pub config: RwLock<Config>,
    /// The external credential-verification capability.
    pub verifier: Box<dyn CredentialVerifier>,
}

impl AppState {
    /// Create new application state from a validated configuration.
    pub fn new(config: Config) -> Arc<Self> {
        let verifier = verifier_from_config(&config.security);
        Arc::new(Self {
            coordinator: PairingCoordinator::new(config.server.broadcast_buffer),
            config: RwLock::new(config),
            verifier,
        })
    }
}
