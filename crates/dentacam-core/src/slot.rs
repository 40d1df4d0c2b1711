//! The authorized slot: the single currently paired device.

use dentacam_types::ConnectionId;

use crate::handle::ClientHandle;

/// Zero-or-one handle for the currently authorized capture device.
///
/// At most one device is paired system-wide. The slot is written only by
/// the pairing state machine; the capture relay merely reads it.
#[derive(Debug, Default)]
pub struct AuthorizedSlot {
    occupant: Option<ClientHandle>,
}

impl AuthorizedSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a device in the slot, replacing any previous occupant.
    pub fn set(&mut self, handle: ClientHandle) {
        self.occupant = Some(handle);
    }

    /// Empty the slot, returning the previous occupant if any.
    pub fn clear(&mut self) -> Option<ClientHandle> {
        self.occupant.take()
    }

    /// The current occupant, if any.
    #[must_use]
    pub fn get(&self) -> Option<&ClientHandle> {
        self.occupant.as_ref()
    }

    /// The occupant's connection id, if any.
    #[must_use]
    pub fn occupant_id(&self) -> Option<ConnectionId> {
        self.occupant.as_ref().map(ClientHandle::id)
    }

    /// Whether a device is paired.
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}
