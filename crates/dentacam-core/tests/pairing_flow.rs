//! End-to-end event-sequence tests for the pairing coordinator.
//!
//! These drive the coordinator exactly as the transport binding does:
//! register / authorize / disconnect events in, status broadcasts and
//! targeted frames out.

use dentacam_core::{ClientHandle, PairingCoordinator};
use dentacam_types::{CaptureCommand, PairingError, PairingStatus, ServerEvent};

fn status(s: PairingStatus) -> ServerEvent {
    ServerEvent::status(s)
}

#[tokio::test]
async fn late_joiner_sees_current_status_without_waiting_for_a_transition() {
    let coordinator = PairingCoordinator::default();
    let (pi, _pi_rx) = ClientHandle::channel();
    coordinator.register(pi).await;

    // A new observer connects mid-WAITING: the transport subscribes first,
    // then unicasts the snapshot. The snapshot alone must already be
    // correct.
    let mut rx = coordinator.subscribe();
    let snapshot = coordinator.status().await;
    assert_eq!(snapshot, PairingStatus::Waiting);

    // No broadcast was needed to learn that.
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn full_pairing_cycle_can_repeat_with_a_different_device() {
    let coordinator = PairingCoordinator::default();
    let (ui, _ui_rx) = ClientHandle::channel();
    let mut observer = coordinator.subscribe();

    let (first, _first_rx) = ClientHandle::channel();
    coordinator.register(first.clone()).await;
    coordinator.authorize(&ui).await.unwrap();
    coordinator.disconnect(first.id()).await;

    let (second, mut second_rx) = ClientHandle::channel();
    coordinator.register(second.clone()).await;
    coordinator.authorize(&ui).await.unwrap();

    let seen: Vec<ServerEvent> = std::iter::from_fn(|| observer.try_recv().ok()).collect();
    assert_eq!(
        seen,
        vec![
            status(PairingStatus::Waiting),
            status(PairingStatus::Connected),
            status(PairingStatus::Disconnected),
            status(PairingStatus::Waiting),
            status(PairingStatus::Connected),
        ]
    );

    // The new occupant, not the old one, receives captures.
    coordinator
        .dispatch_capture(CaptureCommand::new("user-9", "Bearer tok"))
        .await
        .unwrap();
    assert!(matches!(
        second_rx.recv().await.unwrap(),
        ServerEvent::CommandCapture { .. }
    ));
}

#[tokio::test]
async fn authorize_failure_leaves_no_trace() {
    let coordinator = PairingCoordinator::default();
    let (ui, mut ui_rx) = ClientHandle::channel();
    let mut observer = coordinator.subscribe();

    assert_eq!(
        coordinator.authorize(&ui).await,
        Err(PairingError::NoWaitingDevice)
    );

    // Requester got a targeted error; observers saw nothing.
    assert!(matches!(
        ui_rx.recv().await.unwrap(),
        ServerEvent::Error { .. }
    ));
    assert!(observer.try_recv().is_err());

    // The failed authorize changed nothing: a device can still pair.
    let (pi, _pi_rx) = ClientHandle::channel();
    coordinator.register(pi).await;
    coordinator.authorize(&ui).await.unwrap();
    assert_eq!(coordinator.status().await, PairingStatus::Connected);
}

#[tokio::test]
async fn queued_second_device_can_be_authorized_after_first_disconnects() {
    let coordinator = PairingCoordinator::default();
    let (ui, _ui_rx) = ClientHandle::channel();

    let (a, _rx_a) = ClientHandle::channel();
    let (b, _rx_b) = ClientHandle::channel();
    coordinator.register(a.clone()).await;
    coordinator.register(b.clone()).await;

    // First in, first authorized.
    coordinator.authorize(&ui).await.unwrap();
    coordinator.disconnect(a.id()).await;

    // The second device stayed queued the whole time and pairs next.
    coordinator.authorize(&ui).await.unwrap();
    assert_eq!(coordinator.status().await, PairingStatus::Connected);
}

#[tokio::test]
async fn disconnects_in_any_order_never_wedge_the_coordinator() {
    let coordinator = PairingCoordinator::default();
    let (ui, _ui_rx) = ClientHandle::channel();

    let (a, _rx_a) = ClientHandle::channel();
    let (b, _rx_b) = ClientHandle::channel();
    let (c, _rx_c) = ClientHandle::channel();
    coordinator.register(a.clone()).await;
    coordinator.register(b.clone()).await;
    coordinator.register(c.clone()).await;

    coordinator.disconnect(b.id()).await;
    coordinator.authorize(&ui).await.unwrap();
    coordinator.disconnect(a.id()).await;
    coordinator.disconnect(a.id()).await; // stale, ignored
    coordinator.disconnect(c.id()).await;

    assert_eq!(coordinator.status().await, PairingStatus::Disconnected);

    // And the cycle restarts cleanly.
    let (d, _rx_d) = ClientHandle::channel();
    coordinator.register(d).await;
    coordinator.authorize(&ui).await.unwrap();
    assert_eq!(coordinator.status().await, PairingStatus::Connected);
}
