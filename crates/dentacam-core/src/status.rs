//! Status fan-out to connected observers.

use tokio::sync::broadcast;
use tracing::trace;

use dentacam_types::{PairingStatus, ServerEvent};

/// Fan-out channel for pairing status updates.
///
/// Every connected observer subscribes; each status change is delivered
/// at-most-once per subscriber. Observers that are mid-disconnect or
/// lagging behind the buffer may silently miss an update; the snapshot
/// unicast on join is what guarantees late joiners see correct state.
#[derive(Debug, Clone)]
pub struct StatusChannel {
    tx: broadcast::Sender<ServerEvent>,
}

impl StatusChannel {
    /// Create a channel with the given buffer capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe a new observer.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.tx.subscribe()
    }

    /// Announce a status to all current subscribers.
    ///
    /// A send with no subscribers is not an error; there is simply nobody
    /// watching yet.
    pub fn broadcast(&self, status: PairingStatus) {
        trace!(%status, "broadcasting pairing status");
        let _ = self.tx.send(ServerEvent::status(status));
    }

    /// Number of currently subscribed observers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for StatusChannel {
    fn default() -> Self {
        Self::new(100)
    }
}
