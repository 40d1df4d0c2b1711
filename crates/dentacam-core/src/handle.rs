//! Borrowed handles to connected channel participants.

use tokio::sync::mpsc;
use tracing::debug;

use dentacam_types::{ConnectionId, ServerEvent};

/// A cheap, cloneable reference to one connected client.
///
/// The transport layer owns the actual socket; a `ClientHandle` only pairs
/// the connection's identifier with the sending half of its outbound
/// message queue. The pairing core may keep a handle past the peer's
/// disconnect: sending to a vanished peer simply fails and is reported via
/// the return value, never as an error.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<ServerEvent>,
}

impl ClientHandle {
    /// Wrap an existing connection's identifier and outbound sender.
    #[must_use]
    pub fn new(id: ConnectionId, tx: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self { id, tx }
    }

    /// Allocate a fresh handle together with the receiving half of its
    /// outbound queue. The transport (or a test) drains the receiver.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(ConnectionId::new(), tx), rx)
    }

    /// The connection's stable identifier.
    #[must_use]
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue an event for this client.
    ///
    /// Returns `false` if the peer has already vanished (disconnect race);
    /// the caller decides whether that matters.
    pub fn send(&self, event: ServerEvent) -> bool {
        match self.tx.send(event) {
            Ok(()) => true,
            Err(_) => {
                debug!(id = %self.id, "dropping event for vanished peer");
                false
            }
        }
    }
}
