//! Shared DTOs and wiring helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use network_bus::{
    ClientBus, Delivery, Dto, InMemoryClientTransport, InMemoryServerTransport, ServerBus,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Dto)]
#[dto(name = "PlayerMoved")]
pub struct PlayerMoved {
    pub player: String,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Dto)]
#[dto(name = "ChatLine")]
pub struct ChatLine {
    pub text: String,
}

/// Append-only log shared between handlers and assertions.
#[derive(Clone, Default)]
pub struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Deliver everything a client has sent to a server bus, as `sender_id`.
pub fn client_to_server<B: ServerBus>(from: &InMemoryClientTransport, sender_id: &str, to: &B) {
    for packet in from.take_sent() {
        to.receive(sender_id, &packet).unwrap();
    }
}

/// Deliver everything a server has sent to `recipient_id` into a client bus.
pub fn server_to_client<B: ClientBus>(from: &InMemoryServerTransport, recipient_id: &str, to: &B) {
    for delivery in from.deliveries_to(recipient_id) {
        match delivery {
            Delivery::Single { packet, .. } => {
                to.receive(&packet).unwrap();
            }
            Delivery::Batch { packets, .. } => {
                for packet in &packets {
                    to.receive(packet).unwrap();
                }
            }
        }
    }
}
