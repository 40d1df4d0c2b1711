//! The pairing state machine.
//!
//! All pairing logic lives in [`PairingState::apply`], a pure dispatch
//! from (current state, event) to (next state, side effects). The
//! transport binding and the async coordinator execute the side effects;
//! nothing in this module touches a socket or a channel.

use tracing::debug;

use dentacam_types::{ConnectionId, PairingError, PairingStatus};

use crate::handle::ClientHandle;
use crate::slot::AuthorizedSlot;
use crate::waiting::WaitingRoom;

/// Actor-originated events that drive the pairing protocol.
#[derive(Debug)]
pub enum PairingEvent {
    /// A device announced availability on the given connection.
    Register(ClientHandle),
    /// A controller asked to promote one waiting device.
    Authorize {
        /// Connection that issued the request; receives the failure notice
        /// when no device is waiting.
        requester: ConnectionId,
    },
    /// A connection dropped at the transport level.
    Disconnect(ConnectionId),
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// Announce a status to every connected observer.
    Broadcast(PairingStatus),
    /// Notify exactly one client of a failure.
    Reply {
        /// The client to notify.
        to: ConnectionId,
        /// What went wrong.
        error: PairingError,
    },
}

/// Occupancy of the waiting room and the authorized slot.
///
/// The two structures are owned exclusively by this state machine; no
/// other component mutates them. A handle id is never present in both at
/// once.
#[derive(Debug, Default)]
pub struct PairingState {
    waiting: WaitingRoom,
    slot: AuthorizedSlot,
}

impl PairingState {
    /// Create the initial (disconnected) state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current status, derived from occupancy.
    #[must_use]
    pub fn status(&self) -> PairingStatus {
        if self.slot.is_occupied() {
            PairingStatus::Connected
        } else if !self.waiting.is_empty() {
            PairingStatus::Waiting
        } else {
            PairingStatus::Disconnected
        }
    }

    /// The currently authorized device, if any. Read by the capture relay.
    #[must_use]
    pub fn authorized(&self) -> Option<&ClientHandle> {
        self.slot.get()
    }

    /// Whether the given id is registered and awaiting authorization.
    #[must_use]
    pub fn is_waiting(&self, id: ConnectionId) -> bool {
        self.waiting.contains(id)
    }

    /// Number of devices in the waiting room.
    #[must_use]
    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    /// Apply one event and return the side effects to execute.
    pub fn apply(&mut self, event: PairingEvent) -> Vec<SideEffect> {
        match event {
            PairingEvent::Register(handle) => self.register(handle),
            PairingEvent::Authorize { requester } => self.authorize(requester),
            PairingEvent::Disconnect(id) => self.disconnect(id),
        }
    }

    fn register(&mut self, handle: ClientHandle) -> Vec<SideEffect> {
        if self.slot.occupant_id() == Some(handle.id()) {
            // The authorized device re-announced on the same connection; a
            // handle must never sit in both the slot and the waiting room.
            debug!(id = %handle.id(), "ignoring register from authorized device");
            return Vec::new();
        }
        self.waiting.admit(handle);
        vec![SideEffect::Broadcast(PairingStatus::Waiting)]
    }

    fn authorize(&mut self, requester: ConnectionId) -> Vec<SideEffect> {
        match self.waiting.pop_first() {
            Some(device) => {
                self.slot.set(device);
                vec![SideEffect::Broadcast(PairingStatus::Connected)]
            }
            None => vec![SideEffect::Reply {
                to: requester,
                error: PairingError::NoWaitingDevice,
            }],
        }
    }

    fn disconnect(&mut self, id: ConnectionId) -> Vec<SideEffect> {
        if self.slot.occupant_id() == Some(id) {
            self.slot.clear();
            return vec![SideEffect::Broadcast(PairingStatus::Disconnected)];
        }
        if self.waiting.remove(id) {
            if self.waiting.is_empty() && !self.slot.is_occupied() {
                return vec![SideEffect::Broadcast(PairingStatus::Disconnected)];
            }
            // Others still wait; observers already believe WAITING.
            return Vec::new();
        }
        // Stale handle: the connection was neither waiting nor authorized.
        debug!(%id, "disconnect for unknown handle");
        Vec::new()
    }
}
