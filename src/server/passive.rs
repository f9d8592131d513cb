//! Buffering server bus.
//!
//! Sends are queued and only reach the transport on [`PassiveBus::release`],
//! which flushes in two passes:
//!
//! 1. the broadcast queue, to every recipient
//! 2. each recipient's own queue
//!
//! A queue holding one packet goes out as a single send; a longer queue
//! goes out as one ordered batch. Ordering across release cycles is only
//! what the transport preserves per recipient.

use super::ServerBus;
use crate::config::BusConfig;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::model::Packet;
use crate::transport::ServerTransport;

/// Counters from one [`PassiveBus::release`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseStats {
    /// Packets handed to the transport, counted per recipient.
    pub packets: usize,
    /// Transport calls made (single sends plus batches).
    pub sends: usize,
    /// Broadcast packets dropped because there were no recipients.
    pub discarded: usize,
}

#[derive(Debug)]
struct Recipient {
    id: String,
    buffer: Vec<Packet>,
}

/// Server bus that queues outgoing packets until [`release`](Self::release).
///
/// ## Example
///
/// ```
/// use network_bus::{server, InMemoryServerTransport, ServerBus};
///
/// let transport = InMemoryServerTransport::new();
/// let mut bus = server::PassiveBus::new(transport.clone());
/// bus.add_recipients(["x", "y"]);
///
/// bus.send_signal_to_all("TurnStarted").unwrap();
/// bus.send_signal_to("x", "YourMove").unwrap();
/// assert!(transport.is_empty());
///
/// let stats = bus.release().unwrap();
/// assert_eq!(stats.sends, 3);
/// assert_eq!(transport.packets_to("x").len(), 2);
/// ```
#[derive(Debug)]
pub struct PassiveBus<T: ServerTransport> {
    endpoint: Endpoint<T, str>,
    broadcast: Vec<Packet>,
    recipients: Vec<Recipient>,
}

impl<T: ServerTransport> PassiveBus<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, BusConfig::default())
    }

    pub fn with_config(transport: T, config: BusConfig) -> Self {
        Self {
            endpoint: Endpoint::new(transport, config),
            broadcast: Vec::new(),
            recipients: Vec::new(),
        }
    }

    /// Number of queued packets, broadcast and direct.
    pub fn pending(&self) -> usize {
        self.broadcast.len() + self.recipients.iter().map(|r| r.buffer.len()).sum::<usize>()
    }

    /// Flush every queue to the transport and clear it.
    ///
    /// With no recipients the broadcast queue is discarded. Queues are
    /// drained before delivery; if the transport fails part way, the error
    /// is returned and the drained packets are not re-queued.
    pub fn release(&mut self) -> Result<ReleaseStats> {
        let mut stats = ReleaseStats::default();
        let broadcast = std::mem::take(&mut self.broadcast);

        if self.recipients.is_empty() {
            if !broadcast.is_empty() {
                tracing::debug!(
                    discarded = broadcast.len(),
                    "no recipients, discarding broadcast packets"
                );
                stats.discarded = broadcast.len();
            }
            return Ok(stats);
        }

        let transport = self.endpoint.transport();

        if !broadcast.is_empty() {
            for recipient in &self.recipients {
                flush(transport, &recipient.id, &broadcast, &mut stats)?;
            }
        }

        for recipient in &mut self.recipients {
            if recipient.buffer.is_empty() {
                continue;
            }
            let buffer = std::mem::take(&mut recipient.buffer);
            flush(transport, &recipient.id, &buffer, &mut stats)?;
        }

        tracing::trace!(packets = stats.packets, sends = stats.sends, "released");
        Ok(stats)
    }
}

fn flush<T: ServerTransport>(
    transport: &T,
    recipient_id: &str,
    packets: &[Packet],
    stats: &mut ReleaseStats,
) -> Result<()> {
    match packets {
        [] => return Ok(()),
        [packet] => transport.send(recipient_id, packet)?,
        _ => transport.send_batch(recipient_id, packets)?,
    }
    stats.packets += packets.len();
    stats.sends += 1;
    Ok(())
}

impl<T: ServerTransport> ServerBus for PassiveBus<T> {
    type Transport = T;

    fn endpoint(&self) -> &Endpoint<T, str> {
        &self.endpoint
    }

    fn endpoint_mut(&mut self) -> &mut Endpoint<T, str> {
        &mut self.endpoint
    }

    fn add_recipient(&mut self, recipient_id: &str) {
        if recipient_id.is_empty() {
            return;
        }
        self.recipients.push(Recipient {
            id: recipient_id.to_string(),
            buffer: Vec::new(),
        });
    }

    /// Forget every entry for `recipient_id`, pending packets included.
    fn remove_recipient(&mut self, recipient_id: &str) {
        if recipient_id.is_empty() {
            return;
        }
        self.recipients.retain(|r| r.id != recipient_id);
    }

    fn recipients(&self) -> Vec<&str> {
        self.recipients.iter().map(|r| r.id.as_str()).collect()
    }

    /// Queue for one recipient. An id not seen before becomes a recipient,
    /// so it also gets later broadcasts. The empty id is the broadcast queue.
    fn send_packet_to(&mut self, recipient_id: &str, packet: Packet) -> Result<()> {
        if recipient_id.is_empty() {
            return self.send_packet_to_all(packet);
        }
        match self.recipients.iter_mut().find(|r| r.id == recipient_id) {
            Some(recipient) => recipient.buffer.push(packet),
            None => self.recipients.push(Recipient {
                id: recipient_id.to_string(),
                buffer: vec![packet],
            }),
        }
        Ok(())
    }

    fn send_packet_to_all(&mut self, packet: Packet) -> Result<()> {
        self.broadcast.push(packet);
        Ok(())
    }
}
