use serde::{Deserialize, Serialize};

use super::{Dto, Signal};
use crate::error::{BusError, Result};

/// The wire envelope: a packet name plus a serialized payload.
///
/// The name is either [`Signal::PACKET_NAME`] or the `TYPE_NAME` of the
/// DTO encoded in `payload`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Packet {
    pub name: String,
    pub payload: String,
}

impl Packet {
    pub fn new(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }

    /// Encode a DTO as JSON under its type name.
    pub fn create<T: Dto>(dto: &T) -> Result<Self> {
        let payload = serde_json::to_string(dto).map_err(BusError::Encode)?;
        Ok(Self::new(T::TYPE_NAME, payload))
    }

    /// Whether this packet carries a signal rather than a DTO.
    pub fn is_signal(&self) -> bool {
        self.name == Signal::PACKET_NAME
    }
}
