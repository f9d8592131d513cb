use super::ClientBus;
use crate::config::BusConfig;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::model::Packet;
use crate::transport::ClientTransport;

/// Client bus that sends every packet to the transport immediately.
#[derive(Debug)]
pub struct ActiveBus<T: ClientTransport> {
    endpoint: Endpoint<T, ()>,
}

impl<T: ClientTransport> ActiveBus<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, BusConfig::default())
    }

    pub fn with_config(transport: T, config: BusConfig) -> Self {
        Self {
            endpoint: Endpoint::new(transport, config),
        }
    }
}

impl<T: ClientTransport> ClientBus for ActiveBus<T> {
    type Transport = T;

    fn endpoint(&self) -> &Endpoint<T, ()> {
        &self.endpoint
    }

    fn endpoint_mut(&mut self) -> &mut Endpoint<T, ()> {
        &mut self.endpoint
    }

    fn send_packet(&self, packet: Packet) -> Result<()> {
        tracing::trace!(packet = %packet.name, "sending packet");
        self.endpoint.transport().send(&packet)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{DtoHandler, SignalHandler};
    use crate::{Dispatch, Dto, InMemoryClientTransport, Signal};
    use rstest::rstest;
    use serde::{Deserialize, Serialize};
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
    use std::sync::Arc;

    const SIGNAL_NAME: &str = "TestSignal";
    const BAD_SIGNAL_NAME: &str = "BadTestSignal";

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Dto)]
    struct FakeDto {
        number: i64,
        text: String,
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize, Dto)]
    struct BadFakeDto {
        number: i64,
    }

    fn bus() -> (ActiveBus<InMemoryClientTransport>, InMemoryClientTransport) {
        let transport = InMemoryClientTransport::new();
        (ActiveBus::new(transport.clone()), transport)
    }

    fn adder(sum: &Arc<AtomicI64>, amount: i64) -> SignalHandler {
        let sum = Arc::clone(sum);
        Arc::new(move || {
            sum.fetch_add(amount, Ordering::SeqCst);
        })
    }

    #[rstest]
    #[case(0, SIGNAL_NAME, 0)]
    #[case(1, SIGNAL_NAME, 1)]
    #[case(5, SIGNAL_NAME, 5)]
    #[case(0, BAD_SIGNAL_NAME, 0)]
    #[case(1, BAD_SIGNAL_NAME, 0)]
    #[case(5, BAD_SIGNAL_NAME, 0)]
    fn signal_handlers_fire_for_their_name(#[case] handlers: usize, #[case] incoming: &str, #[case] expected: usize) {
        let (mut bus, _) = bus();
        let calls = Arc::new(AtomicUsize::new(0));
        for _ in 0..handlers {
            let calls = Arc::clone(&calls);
            bus.meet_signal(SIGNAL_NAME, Arc::new(move || {
                calls.fetch_add(1, Ordering::SeqCst);
            }));
        }

        bus.receive(&Signal::as_packet(incoming)).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), expected);
    }

    #[rstest]
    #[case(0, true)]
    #[case(1, true)]
    #[case(5, true)]
    #[case(0, false)]
    #[case(1, false)]
    #[case(5, false)]
    fn dto_handlers_fire_for_their_type(#[case] handlers: usize, #[case] matching: bool) {
        let (mut bus, _) = bus();
        let fake = FakeDto {
            number: 10,
            ..Default::default()
        };
        let calls = Arc::new(AtomicUsize::new(0));
        let sum = Arc::new(AtomicI64::new(0));
        for _ in 0..handlers {
            let calls = Arc::clone(&calls);
            let sum = Arc::clone(&sum);
            bus.meet::<FakeDto>(Arc::new(move |dto: &FakeDto| {
                sum.fetch_add(dto.number, Ordering::SeqCst);
                calls.fetch_add(1, Ordering::SeqCst);
            }));
        }

        let packet = if matching {
            Packet::create(&fake).unwrap()
        } else {
            Packet::create(&BadFakeDto::default()).unwrap()
        };
        bus.receive(&packet).unwrap();

        let expected = if matching { handlers } else { 0 };
        assert_eq!(calls.load(Ordering::SeqCst), expected);
        assert_eq!(sum.load(Ordering::SeqCst), expected as i64 * fake.number);
    }

    #[test]
    fn forget_signal_removes_only_that_handler() {
        let (mut bus, _) = bus();
        let sum = Arc::new(AtomicI64::new(0));
        let handler1 = adder(&sum, 1);
        let handler2 = adder(&sum, 5);
        bus.meet_signal(SIGNAL_NAME, handler1.clone());
        bus.meet_signal(SIGNAL_NAME, handler2.clone());

        bus.forget_signal(SIGNAL_NAME, &handler1);
        bus.receive(&Signal::as_packet(SIGNAL_NAME)).unwrap();

        assert_eq!(sum.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn forget_signal_unknown_handler_is_noop() {
        let (mut bus, _) = bus();
        let sum = Arc::new(AtomicI64::new(0));
        bus.meet_signal(SIGNAL_NAME, adder(&sum, 1));
        bus.meet_signal(SIGNAL_NAME, adder(&sum, 5));

        bus.forget_signal(SIGNAL_NAME, &adder(&sum, 10));
        bus.receive(&Signal::as_packet(SIGNAL_NAME)).unwrap();

        assert_eq!(sum.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn forget_dto_removes_only_that_handler() {
        let (mut bus, _) = bus();
        let sum = Arc::new(AtomicI64::new(0));
        let scaled = |factor: i64| -> DtoHandler<FakeDto> {
            let sum = Arc::clone(&sum);
            Arc::new(move |dto: &FakeDto| {
                sum.fetch_add(dto.number * factor, Ordering::SeqCst);
            })
        };
        let handler1 = scaled(1);
        let handler2 = scaled(5);
        bus.meet(handler1.clone());
        bus.meet(handler2.clone());

        bus.forget(&handler1);
        bus.forget(&scaled(10));
        bus.receive(&Packet::create(&FakeDto { number: 10, ..Default::default() }).unwrap())
            .unwrap();

        assert_eq!(sum.load(Ordering::SeqCst), 50);
    }

    #[test]
    fn send_signal_matches_signal_packet() {
        let (bus, transport) = bus();
        bus.send_signal(SIGNAL_NAME).unwrap();

        assert_eq!(transport.sent(), vec![Signal::as_packet(SIGNAL_NAME)]);
    }

    #[test]
    fn send_dto_matches_created_packet() {
        let (bus, transport) = bus();
        let fake = FakeDto {
            number: 10,
            text: "ten".into(),
        };
        bus.send(&fake).unwrap();

        assert_eq!(transport.sent(), vec![Packet::create(&fake).unwrap()]);
    }

    #[test]
    fn closed_bus_ignores_packets() {
        let (mut bus, _) = bus();
        let sum = Arc::new(AtomicI64::new(0));
        bus.meet_signal(SIGNAL_NAME, adder(&sum, 1));

        bus.close(false);
        assert_eq!(bus.receive(&Signal::as_packet(SIGNAL_NAME)).unwrap(), Dispatch::Detached);

        bus.open();
        bus.receive(&Signal::as_packet(SIGNAL_NAME)).unwrap();
        assert_eq!(sum.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn close_clears_handlers_when_asked() {
        let (mut bus, _) = bus();
        let sum = Arc::new(AtomicI64::new(0));
        bus.meet_signal(SIGNAL_NAME, adder(&sum, 1));

        bus.close(true);
        bus.open();
        bus.receive(&Signal::as_packet(SIGNAL_NAME)).unwrap();

        assert_eq!(sum.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn panicking_handler_unwinds_and_skips_later_handlers() {
        let (mut bus, _) = bus();
        let sum = Arc::new(AtomicI64::new(0));
        bus.meet_signal(SIGNAL_NAME, Arc::new(|| panic!("handler failed")));
        bus.meet_signal(SIGNAL_NAME, adder(&sum, 1));

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            bus.receive(&Signal::as_packet(SIGNAL_NAME))
        }));

        assert!(outcome.is_err());
        assert_eq!(sum.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn signal_type_cannot_be_met_as_a_dto() {
        let (mut bus, _) = bus();
        let hits = Arc::new(AtomicUsize::new(0));
        let handler: DtoHandler<Signal> = {
            let hits = Arc::clone(&hits);
            Arc::new(move |_: &Signal| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };
        bus.meet::<Signal>(handler);

        let outcome = bus.receive(&Signal::as_packet("X")).unwrap();

        assert!(matches!(outcome, Dispatch::Signal { handlers: 0, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn bus_can_borrow_its_transport() {
        let transport = InMemoryClientTransport::new();
        let bus = ActiveBus::new(&transport);

        bus.send_signal(SIGNAL_NAME).unwrap();

        assert_eq!(transport.sent(), vec![Signal::as_packet(SIGNAL_NAME)]);
    }

    #[test]
    fn change_transport_redirects_sends() {
        let (mut bus, first) = bus();
        let sum = Arc::new(AtomicI64::new(0));
        bus.meet_signal(SIGNAL_NAME, adder(&sum, 1));

        let second = InMemoryClientTransport::new();
        bus.change_transport(second.clone());
        bus.send_signal(SIGNAL_NAME).unwrap();
        bus.receive(&Signal::as_packet(SIGNAL_NAME)).unwrap();

        assert!(first.is_empty());
        assert_eq!(second.len(), 1);
        assert_eq!(sum.load(Ordering::SeqCst), 1);
    }
}
