use serde::{Deserialize, Serialize};

use super::{Dto, Packet};

/// A named event with no payload.
///
/// Signals travel inside a packet named [`Signal::PACKET_NAME`]; the
/// signal's own name is the packet payload (`{"name":"..."}`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signal {
    pub name: String,
}

impl Signal {
    /// Reserved packet name marking a signal packet.
    pub const PACKET_NAME: &'static str = "Signal";

    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Build the packet for a signal.
    pub fn as_packet(name: &str) -> Packet {
        let payload = serde_json::json!({ "name": name }).to_string();
        Packet::new(Self::PACKET_NAME, payload)
    }
}

/// Lets a signal be encoded through [`Packet::create`]. Inbound packets
/// with this name always dispatch as signals, so a DTO handler met for
/// `Signal` never fires; subscribe with `meet_signal` instead.
impl Dto for Signal {
    const TYPE_NAME: &'static str = Signal::PACKET_NAME;
}
