//! The pairing coordinator: single owner of the shared pairing state.

use tokio::sync::{Mutex, broadcast};
use tracing::{info, warn};

use dentacam_types::{
    CaptureCommand, ConnectionId, PairingError, PairingResult, PairingStatus, ServerEvent,
};

use crate::handle::ClientHandle;
use crate::pairing::{PairingEvent, PairingState, SideEffect};
use crate::status::StatusChannel;

/// Serializes every pairing mutation and capture dispatch behind one lock.
///
/// The pairing subsystem is one actor: register, authorize, disconnect and
/// the relay's slot read all run under the same mutex, so no interleaving
/// can observe a half-applied transition. Construct one instance at
/// process start (or per test); there is no ambient global.
#[derive(Debug)]
pub struct PairingCoordinator {
    state: Mutex<PairingState>,
    status: StatusChannel,
}

impl PairingCoordinator {
    /// Create a coordinator whose status channel buffers `capacity`
    /// updates per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(PairingState::new()),
            status: StatusChannel::new(capacity),
        }
    }

    /// Subscribe to status updates. Subscribe before reading the snapshot
    /// via [`status`](Self::status) so no transition is missed in between.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.status.subscribe()
    }

    /// Snapshot of the current pairing status, for the unicast to a newly
    /// joined observer.
    pub async fn status(&self) -> PairingStatus {
        self.state.lock().await.status()
    }

    /// A device announced availability.
    pub async fn register(&self, handle: ClientHandle) {
        info!(id = %handle.id(), "device entered the waiting room");
        let mut state = self.state.lock().await;
        let effects = state.apply(PairingEvent::Register(handle));
        self.run_effects(effects, None);
    }

    /// A controller asked to promote one waiting device.
    ///
    /// On success the earliest-registered device becomes the authorized
    /// one and `CONNECTED` is broadcast. With an empty waiting room the
    /// requester alone receives the wire `error` frame and
    /// [`PairingError::NoWaitingDevice`] is returned.
    pub async fn authorize(&self, requester: &ClientHandle) -> PairingResult<()> {
        let mut state = self.state.lock().await;
        let effects = state.apply(PairingEvent::Authorize {
            requester: requester.id(),
        });
        let failed = effects
            .iter()
            .any(|e| matches!(e, SideEffect::Reply { .. }));
        self.run_effects(effects, Some(requester));
        if failed {
            Err(PairingError::NoWaitingDevice)
        } else {
            info!("device authorized by controller");
            Ok(())
        }
    }

    /// A connection dropped. Trusted unconditionally as an implicit
    /// unregister; unknown handles are ignored.
    pub async fn disconnect(&self, id: ConnectionId) {
        let mut state = self.state.lock().await;
        let effects = state.apply(PairingEvent::Disconnect(id));
        self.run_effects(effects, None);
    }

    /// Relay a capture command to the authorized device.
    ///
    /// Fire-and-forget: returns `Ok` as soon as the command is queued for
    /// the device; nothing waits for the capture to happen. Returns
    /// [`PairingError::DeviceOffline`] when no device is paired.
    pub async fn dispatch_capture(&self, cmd: CaptureCommand) -> PairingResult<()> {
        let state = self.state.lock().await;
        match state.authorized() {
            Some(device) => {
                info!(user = %cmd.user_id, "relaying capture command to device");
                if !device.send(ServerEvent::capture(cmd)) {
                    // Device vanished between its disconnect and our
                    // handling of it; delivery is best-effort.
                    warn!("capture command dropped: device connection already closed");
                }
                Ok(())
            }
            None => Err(PairingError::DeviceOffline),
        }
    }

    // Effects run while the state lock is held so broadcast order always
    // matches transition order.
    fn run_effects(&self, effects: Vec<SideEffect>, requester: Option<&ClientHandle>) {
        for effect in effects {
            match effect {
                SideEffect::Broadcast(status) => {
                    info!(%status, "pairing status changed");
                    self.status.broadcast(status);
                }
                SideEffect::Reply { to, error } => match requester {
                    Some(handle) if handle.id() == to => {
                        handle.send(ServerEvent::error(error.to_string()));
                    }
                    _ => warn!(%to, "no reply channel for targeted error"),
                },
            }
        }
    }
}

impl Default for PairingCoordinator {
    fn default() -> Self {
        Self::new(100)
    }
}
