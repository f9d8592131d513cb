//! Transport capability consumed by the buses.
//!
//! A bus only needs a send primitive. The receive notification runs the
//! other way: whatever owns the connection calls the bus's `receive`
//! method for each inbound packet, synchronously, on its own thread.
//!
//! ```text
//!   application ──meet/send──▶ Bus ──send──▶ Transport ──▶ wire
//!   application ◀──handlers── Bus ◀─receive── transport glue ◀── wire
//! ```
//!
//! Ordering between distinct recipients is whatever the transport gives;
//! the bus adds no reordering or acknowledgement of its own.

mod in_memory;

pub use in_memory::{Delivery, InMemoryClientTransport, InMemoryServerTransport};

use crate::error::TransportError;
use crate::model::Packet;

/// Transport for a client bus with exactly one logical peer.
pub trait ClientTransport {
    /// Send one packet to the peer.
    fn send(&self, packet: &Packet) -> Result<(), TransportError>;
}

/// Transport for a server bus addressing many peers by id.
pub trait ServerTransport {
    /// Send one packet to a recipient.
    fn send(&self, recipient_id: &str, packet: &Packet) -> Result<(), TransportError>;

    /// Send an ordered batch of packets to a recipient as one delivery.
    ///
    /// Default implementation sends packets sequentially.
    /// Implementations should override to frame the batch as a unit.
    fn send_batch(&self, recipient_id: &str, packets: &[Packet]) -> Result<(), TransportError> {
        for packet in packets {
            self.send(recipient_id, packet)?;
        }
        Ok(())
    }
}

impl<T: ClientTransport + ?Sized> ClientTransport for &T {
    fn send(&self, packet: &Packet) -> Result<(), TransportError> {
        (**self).send(packet)
    }
}

impl<T: ServerTransport + ?Sized> ServerTransport for &T {
    fn send(&self, recipient_id: &str, packet: &Packet) -> Result<(), TransportError> {
        (**self).send(recipient_id, packet)
    }

    fn send_batch(&self, recipient_id: &str, packets: &[Packet]) -> Result<(), TransportError> {
        (**self).send_batch(recipient_id, packets)
    }
}
