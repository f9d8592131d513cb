//! Server-side buses: many peers, addressed by recipient id.
//!
//! Inbound packets carry the sender id, which is passed to every handler.
//! Two sending strategies share the same registration and dispatch:
//!
//! - [`ActiveBus`] sends each packet as soon as it is produced
//! - [`PassiveBus`] buffers per recipient until [`PassiveBus::release`]

mod active;
mod passive;

pub use active::ActiveBus;
pub use passive::{PassiveBus, ReleaseStats};

use std::sync::Arc;

use crate::dispatch::Dispatch;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::model::{Dto, Packet, Signal};
use crate::registrar::HandlerId;
use crate::transport::ServerTransport;

/// Callback for a signal on a server bus; receives the sender id.
pub type PeerSignalHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Callback for a DTO of type `T` on a server bus; receives the sender id.
pub type PeerDtoHandler<T> = Arc<dyn Fn(&str, &T) + Send + Sync>;

/// Operations common to server buses.
///
/// Implementors own the recipient set and decide when packets reach the
/// transport. Like [`ClientBus`](crate::ClientBus), no locking is done
/// here; concurrent `receive` calls need external serialization.
pub trait ServerBus {
    type Transport: ServerTransport;

    fn endpoint(&self) -> &Endpoint<Self::Transport, str>;

    fn endpoint_mut(&mut self) -> &mut Endpoint<Self::Transport, str>;

    /// Register a recipient for `send_*_to_all`. Duplicates are not checked;
    /// the empty id is ignored.
    fn add_recipient(&mut self, recipient_id: &str);

    /// Forget a recipient. Unknown or empty ids are ignored.
    fn remove_recipient(&mut self, recipient_id: &str);

    /// Known recipient ids, in registration order.
    fn recipients(&self) -> Vec<&str>;

    /// Deliver (or queue) an encoded packet for one recipient.
    fn send_packet_to(&mut self, recipient_id: &str, packet: Packet) -> Result<()>;

    /// Deliver (or queue) an encoded packet for every recipient.
    fn send_packet_to_all(&mut self, packet: Packet) -> Result<()>;

    fn add_recipients<I, S>(&mut self, recipient_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in recipient_ids {
            self.add_recipient(id.as_ref());
        }
    }

    /// Subscribe `handler` to the signal `signal_name`.
    fn meet_signal(&mut self, signal_name: &str, handler: PeerSignalHandler) {
        let id = HandlerId::of(&handler);
        self.endpoint_mut()
            .registrar_mut()
            .add_signal_handler(signal_name, id, Box::new(move |sender: &str| handler(sender)));
    }

    /// Subscribe `handler` to DTOs of type `T`.
    fn meet<T: Dto>(&mut self, handler: PeerDtoHandler<T>) {
        let id = HandlerId::of(&handler);
        self.endpoint_mut()
            .registrar_mut()
            .add_dto_handler::<T>(id, Box::new(move |sender: &str, dto: &T| handler(sender, dto)));
    }

    fn forget_signal(&mut self, signal_name: &str, handler: &PeerSignalHandler) {
        self.endpoint_mut()
            .registrar_mut()
            .remove_signal_handler(signal_name, HandlerId::of(handler));
    }

    fn forget<T: Dto>(&mut self, handler: &PeerDtoHandler<T>) {
        self.endpoint_mut()
            .registrar_mut()
            .remove_dto_handler::<T>(HandlerId::of(handler));
    }

    fn send_signal_to(&mut self, recipient_id: &str, signal_name: &str) -> Result<()> {
        self.send_packet_to(recipient_id, Signal::as_packet(signal_name))
    }

    fn send_signal_to_all(&mut self, signal_name: &str) -> Result<()> {
        self.send_packet_to_all(Signal::as_packet(signal_name))
    }

    fn send_to<T: Dto>(&mut self, recipient_id: &str, dto: &T) -> Result<()> {
        self.send_packet_to(recipient_id, Packet::create(dto)?)
    }

    /// Encode once and address the same packet to every recipient.
    fn send_to_all<T: Dto>(&mut self, dto: &T) -> Result<()> {
        self.send_packet_to_all(Packet::create(dto)?)
    }

    /// Receive notification: dispatch one packet from `sender_id`.
    fn receive(&self, sender_id: &str, packet: &Packet) -> Result<Dispatch> {
        self.endpoint().receive(sender_id, packet)
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

    /// Rebind to another transport, keeping registrations and recipients.
    fn change_transport(&mut self, transport: Self::Transport) -> Self::Transport {
        self.endpoint_mut().change_transport(transport)
    }
}
