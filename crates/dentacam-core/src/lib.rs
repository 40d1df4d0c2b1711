//! Pairing and capture coordination core for the dentacam gateway.
//!
//! This crate implements the stateful heart of the gateway: exactly one
//! physical capture device may register, be authorized by a controller,
//! receive capture commands, and be torn down on disconnect, while every
//! connected observer is kept informed of the pairing status.
//!
//! # Architecture
//!
//! - [`WaitingRoom`]: insertion-ordered queue of registered-but-
//!   unauthorized devices; arrival order is the authorize tie-break.
//! - [`AuthorizedSlot`]: the zero-or-one currently paired device.
//! - [`PairingState`]: pure `(state, event) -> (state, side effects)`
//!   dispatch over the two structures above; independently testable with
//!   no transport attached.
//! - [`PairingCoordinator`]: the single owning actor. All mutations and
//!   the capture relay's slot read serialize behind one mutex.
//! - [`StatusChannel`]: broadcast fan-out of status changes to observers.
//!
//! The transport layer owns every connection; the core holds only
//! [`ClientHandle`]s (id + outbound queue sender) and tolerates a peer
//! vanishing at any point.
//!
//! # Quick start
//!
//! ```
//! use dentacam_core::{ClientHandle, PairingCoordinator};
//! use dentacam_types::{CaptureCommand, PairingStatus};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let coordinator = PairingCoordinator::default();
//!
//! let (device, mut device_rx) = ClientHandle::channel();
//! let (controller, _controller_rx) = ClientHandle::channel();
//!
//! coordinator.register(device).await;
//! coordinator.authorize(&controller).await.unwrap();
//! assert_eq!(coordinator.status().await, PairingStatus::Connected);
//!
//! coordinator
//!     .dispatch_capture(CaptureCommand::new("user-1", "Bearer token"))
//!     .await
//!     .unwrap();
//! assert!(device_rx.recv().await.is_some());
//! # }
//! ```

pub mod coordinator;
pub mod handle;
pub mod pairing;
pub mod slot;
pub mod status;
pub mod waiting;

pub use coordinator::PairingCoordinator;
pub use handle::ClientHandle;
pub use pairing::{PairingEvent, PairingState, SideEffect};
pub use slot::AuthorizedSlot;
pub use status::StatusChannel;
pub use waiting::WaitingRoom;
