use super::ServerBus;
use crate::config::BusConfig;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::model::Packet;
use crate::transport::ServerTransport;

/// Server bus that sends every packet to the transport immediately.
#[derive(Debug)]
pub struct ActiveBus<T: ServerTransport> {
    endpoint: Endpoint<T, str>,
    recipients: Vec<String>,
}

impl<T: ServerTransport> ActiveBus<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, BusConfig::default())
    }

    pub fn with_config(transport: T, config: BusConfig) -> Self {
        Self {
            endpoint: Endpoint::new(transport, config),
            recipients: Vec::new(),
        }
    }
}

impl<T: ServerTransport> ServerBus for ActiveBus<T> {
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
        self.recipients.push(recipient_id.to_string());
    }

    fn remove_recipient(&mut self, recipient_id: &str) {
        if recipient_id.is_empty() {
            return;
        }
        if let Some(index) = self.recipients.iter().position(|id| id == recipient_id) {
            self.recipients.remove(index);
        }
    }

    fn recipients(&self) -> Vec<&str> {
        self.recipients.iter().map(|id| id.as_str()).collect()
    }

    fn send_packet_to(&mut self, recipient_id: &str, packet: Packet) -> Result<()> {
        self.endpoint.transport().send(recipient_id, &packet)?;
        Ok(())
    }

    fn send_packet_to_all(&mut self, packet: Packet) -> Result<()> {
        for id in &self.recipients {
            self.endpoint.transport().send(id, &packet)?;
        }
        tracing::trace!(packet = %packet.name, recipients = self.recipients.len(), "sent to all");
        Ok(())
    }
}
