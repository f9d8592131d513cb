//! In-memory transports for testing and single-process scenarios.
//!
//! Both transports record what a bus sends instead of putting it on a
//! wire. Clones share the same record, so a test can hand one clone to a
//! bus and inspect another.

use std::sync::{Arc, Mutex, MutexGuard};

use super::{ClientTransport, ServerTransport};
use crate::error::TransportError;
use crate::model::Packet;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Recording transport for a client bus.
///
/// ## Example
///
/// ```
/// use network_bus::{client, ClientBus, InMemoryClientTransport, Signal};
///
/// let transport = InMemoryClientTransport::new();
/// let bus = client::ActiveBus::new(transport.clone());
///
/// bus.send_signal("Ping").unwrap();
/// assert_eq!(transport.sent(), vec![Signal::as_packet("Ping")]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryClientTransport {
    sent: Arc<Mutex<Vec<Packet>>>,
}

impl InMemoryClientTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every packet sent so far, in order.
    pub fn sent(&self) -> Vec<Packet> {
        lock(&self.sent).clone()
    }

    /// Drain the sent packets, e.g. to feed them to a peer bus.
    pub fn take_sent(&self) -> Vec<Packet> {
        std::mem::take(&mut *lock(&self.sent))
    }

    pub fn len(&self) -> usize {
        lock(&self.sent).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.sent).is_empty()
    }
}

impl ClientTransport for InMemoryClientTransport {
    fn send(&self, packet: &Packet) -> Result<(), TransportError> {
        lock(&self.sent).push(packet.clone());
        Ok(())
    }
}

/// One call made on a server transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    Single {
        recipient_id: String,
        packet: Packet,
    },
    Batch {
        recipient_id: String,
        packets: Vec<Packet>,
    },
}

impl Delivery {
    pub fn recipient_id(&self) -> &str {
        match self {
            Delivery::Single { recipient_id, .. } | Delivery::Batch { recipient_id, .. } => {
                recipient_id
            }
        }
    }

    /// Packets carried by this delivery, in order.
    pub fn packets(&self) -> Vec<&Packet> {
        match self {
            Delivery::Single { packet, .. } => vec![packet],
            Delivery::Batch { packets, .. } => packets.iter().collect(),
        }
    }
}

/// Recording transport for a server bus.
///
/// Single sends and batched sends are kept apart so callers can see how a
/// bus grouped its output.
#[derive(Clone, Debug, Default)]
pub struct InMemoryServerTransport {
    deliveries: Arc<Mutex<Vec<Delivery>>>,
}

impl InMemoryServerTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every transport call so far, in order.
    pub fn deliveries(&self) -> Vec<Delivery> {
        lock(&self.deliveries).clone()
    }

    /// Transport calls addressed to one recipient.
    pub fn deliveries_to(&self, recipient_id: &str) -> Vec<Delivery> {
        lock(&self.deliveries)
            .iter()
            .filter(|d| d.recipient_id() == recipient_id)
            .cloned()
            .collect()
    }

    /// Packets received by one recipient, batches flattened, in order.
    pub fn packets_to(&self, recipient_id: &str) -> Vec<Packet> {
        lock(&self.deliveries)
            .iter()
            .filter(|d| d.recipient_id() == recipient_id)
            .flat_map(|d| d.packets().into_iter().cloned())
            .collect()
    }

    pub fn take_deliveries(&self) -> Vec<Delivery> {
        std::mem::take(&mut *lock(&self.deliveries))
    }

    pub fn len(&self) -> usize {
        lock(&self.deliveries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.deliveries).is_empty()
    }
}

impl ServerTransport for InMemoryServerTransport {
    fn send(&self, recipient_id: &str, packet: &Packet) -> Result<(), TransportError> {
        lock(&self.deliveries).push(Delivery::Single {
            recipient_id: recipient_id.to_string(),
            packet: packet.clone(),
        });
        Ok(())
    }

    fn send_batch(&self, recipient_id: &str, packets: &[Packet]) -> Result<(), TransportError> {
        lock(&self.deliveries).push(Delivery::Batch {
            recipient_id: recipient_id.to_string(),
            packets: packets.to_vec(),
        });
        Ok(())
    }
}
