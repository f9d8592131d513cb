//! Server bus behavior through the public API.

mod support;

use std::sync::Arc;

use network_bus::{
    server, BusConfig, BusError, DecodeFailurePolicy, Delivery, Dispatch, DropReason,
    InMemoryServerTransport, Packet, PeerSignalHandler, ServerBus, Signal,
};
use support::{ChatLine, Log, PlayerMoved};

#[test]
fn broadcast_then_direct_within_one_release() {
    let transport = InMemoryServerTransport::new();
    let mut bus = server::PassiveBus::new(transport.clone());
    bus.add_recipients(["x", "y", "z"]);

    bus.send_to_all(&ChatLine { text: "one".into() }).unwrap();
    bus.send_to_all(&ChatLine { text: "two".into() }).unwrap();
    bus.send_to("y", &ChatLine { text: "only y".into() }).unwrap();
    let stats = bus.release().unwrap();

    assert_eq!(stats.sends, 4);
    let kinds: Vec<&str> = transport
        .deliveries()
        .iter()
        .map(|d| match d {
            Delivery::Single { .. } => "single",
            Delivery::Batch { .. } => "batch",
        })
        .collect();
    assert_eq!(kinds, vec!["batch", "batch", "batch", "single"]);
    assert_eq!(transport.packets_to("y").len(), 3);
}

#[test]
fn auto_created_recipient_receives_later_broadcasts() {
    let transport = InMemoryServerTransport::new();
    let mut bus = server::PassiveBus::new(transport.clone());

    bus.send_signal_to("newcomer", "Welcome").unwrap();
    bus.release().unwrap();
    bus.send_signal_to_all("Tick").unwrap();
    bus.release().unwrap();

    assert_eq!(
        transport.packets_to("newcomer"),
        vec![Signal::as_packet("Welcome"), Signal::as_packet("Tick")]
    );
}

#[test]
fn undecodable_payload_propagates_by_default() {
    let mut bus = server::ActiveBus::new(InMemoryServerTransport::new());
    bus.meet::<PlayerMoved>(Arc::new(|_: &str, _: &PlayerMoved| {}));

    let err = bus
        .receive("peer", &Packet::new("PlayerMoved", r#"{"player":"ana"}"#))
        .unwrap_err();

    assert!(matches!(err, BusError::Decode { .. }));
}

#[test]
fn undecodable_payload_can_be_dropped() {
    let config = BusConfig::new().with_decode_failure(DecodeFailurePolicy::Drop);
    let mut bus = server::ActiveBus::with_config(InMemoryServerTransport::new(), config);
    let log = Log::default();
    let moves = log.clone();
    bus.meet::<PlayerMoved>(Arc::new(move |_: &str, dto: &PlayerMoved| moves.push(dto.player.clone())));

    let outcome = bus
        .receive("peer", &Packet::new("PlayerMoved", "[]"))
        .unwrap();

    assert_eq!(outcome, Dispatch::Dropped(DropReason::UndecodableDto("PlayerMoved".into())));
    assert!(log.entries().is_empty());
}

#[test]
fn change_transport_keeps_handlers_and_recipients() {
    let first = InMemoryServerTransport::new();
    let second = InMemoryServerTransport::new();
    let mut bus = server::ActiveBus::new(first.clone());
    bus.add_recipient("a");

    let log = Log::default();
    let seen = log.clone();
    let handler: PeerSignalHandler = Arc::new(move |sender: &str| seen.push(sender));
    bus.meet_signal("Ready", handler.clone());

    bus.change_transport(second.clone());
    bus.send_signal_to_all("Go").unwrap();
    bus.receive("a", &Signal::as_packet("Ready")).unwrap();

    assert!(first.is_empty());
    assert_eq!(second.packets_to("a"), vec![Signal::as_packet("Go")]);
    assert_eq!(log.entries(), vec!["a"]);

    bus.forget_signal("Ready", &handler);
    assert_eq!(bus.receive("a", &Signal::as_packet("Ready")).unwrap().handlers(), 0);
}
