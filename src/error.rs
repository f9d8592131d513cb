//! Error types for bus and transport operations.

use std::error::Error;

/// Result type for bus operations.
pub type Result<T> = std::result::Result<T, BusError>;

/// Errors surfaced by a bus.
///
/// Unknown packet names and malformed signal payloads are not errors; they
/// are reported as [`Dispatch::Dropped`](crate::Dispatch::Dropped).
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// An outgoing DTO could not be serialized.
    #[error("failed to encode payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// An inbound payload named a registered DTO type but did not decode
    /// into that type.
    #[error("failed to decode payload as `{type_name}`: {source}")]
    Decode {
        type_name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The transport refused or failed to deliver a packet.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Error type for transport send operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection to the peer failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The transport rejected the packet
    #[error("packet rejected: {0}")]
    Rejected(String),

    /// No connection is known for the recipient
    #[error("unknown recipient: {0}")]
    UnknownRecipient(String),

    /// Other error
    #[error("transport error: {0}")]
    Other(#[source] Box<dyn Error + Send + Sync>),
}
