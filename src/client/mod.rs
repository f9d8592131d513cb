//! Client-side bus: one transport, one logical peer.
//!
//! ```
//! use std::sync::Arc;
//! use network_bus::{client, ClientBus, InMemoryClientTransport, SignalHandler};
//!
//! let transport = InMemoryClientTransport::new();
//! let mut bus = client::ActiveBus::new(transport.clone());
//!
//! let on_ping: SignalHandler = Arc::new(|| println!("ping"));
//! bus.meet_signal("Ping", on_ping.clone());
//!
//! // Whatever reads the socket hands packets to the bus.
//! bus.send_signal("Ping").unwrap();
//! for packet in transport.take_sent() {
//!     bus.receive(&packet).unwrap();
//! }
//!
//! bus.forget_signal("Ping", &on_ping);
//! ```

mod active;

pub use active::ActiveBus;

use std::sync::Arc;

use crate::dispatch::Dispatch;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::model::{Dto, Packet, Signal};
use crate::registrar::HandlerId;
use crate::transport::ClientTransport;

/// Callback for a signal on a client bus.
pub type SignalHandler = Arc<dyn Fn() + Send + Sync>;

/// Callback for a DTO of type `T` on a client bus.
pub type DtoHandler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Operations common to client buses.
///
/// Implementors provide the endpoint and decide how an outgoing packet
/// reaches the transport; registration, encoding, and dispatch are shared.
///
/// Not internally synchronized: `receive` borrows the bus, so a transport
/// with several reader threads must serialize its calls.
pub trait ClientBus {
    type Transport: ClientTransport;

    fn endpoint(&self) -> &Endpoint<Self::Transport, ()>;

    fn endpoint_mut(&mut self) -> &mut Endpoint<Self::Transport, ()>;

    /// Hand an encoded packet to the transport.
    fn send_packet(&self, packet: Packet) -> Result<()>;

    /// Subscribe `handler` to the signal `signal_name`.
    fn meet_signal(&mut self, signal_name: &str, handler: SignalHandler) {
        let id = HandlerId::of(&handler);
        self.endpoint_mut()
            .registrar_mut()
            .add_signal_handler(signal_name, id, Box::new(move |_: &()| handler()));
    }

    /// Subscribe `handler` to DTOs of type `T`.
    fn meet<T: Dto>(&mut self, handler: DtoHandler<T>) {
        let id = HandlerId::of(&handler);
        self.endpoint_mut()
            .registrar_mut()
            .add_dto_handler::<T>(id, Box::new(move |_: &(), dto: &T| handler(dto)));
    }

    /// Unsubscribe one registration of `handler` from `signal_name`.
    fn forget_signal(&mut self, signal_name: &str, handler: &SignalHandler) {
        self.endpoint_mut()
            .registrar_mut()
            .remove_signal_handler(signal_name, HandlerId::of(handler));
    }

    /// Unsubscribe one registration of `handler` from DTOs of type `T`.
    fn forget<T: Dto>(&mut self, handler: &DtoHandler<T>) {
        self.endpoint_mut()
            .registrar_mut()
            .remove_dto_handler::<T>(HandlerId::of(handler));
    }

    fn send_signal(&self, signal_name: &str) -> Result<()> {
        self.send_packet(Signal::as_packet(signal_name))
    }

    fn send<T: Dto>(&self, dto: &T) -> Result<()> {
        self.send_packet(Packet::create(dto)?)
    }

    /// Receive notification: dispatch one inbound packet.
    fn receive(&self, packet: &Packet) -> Result<Dispatch> {
        self.endpoint().receive(&(), packet)
    }

    fn transport(&self) -> &Self::Transport {
        self.endpoint().transport()
    }

    fn is_open(&self) -> bool {
        self.endpoint().is_open()
    }

    fn open(&mut self) {
        self.endpoint_mut().open();
    }

    /// Stop receiving. `remove_handlers` also clears every registration.
    fn close(&mut self, remove_handlers: bool) {
        self.endpoint_mut().close(remove_handlers);
    }

    /// Rebind to another transport, keeping registrations.
    fn change_transport(&mut self, transport: Self::Transport) -> Self::Transport {
        self.endpoint_mut().change_transport(transport)
    }
}
