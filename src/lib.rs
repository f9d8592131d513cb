//! Typed publish/subscribe message bus over an injected network transport.
//!
//! Processes register interest in named zero-payload *signals* or typed
//! payloads (*DTOs*); inbound packets are routed to every matching handler,
//! and outgoing sends are serialized into [`Packet`]s for the transport.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │   client::ActiveBus     server::ActiveBus  server::PassiveBus│
//! │   (one peer)            (send now)         (buffer/release) │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Endpoint: transport + open flag + Registrar + BusConfig    │
//! │  dispatch: Packet ─▶ Signal / DTO route ─▶ handlers         │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │        ClientTransport / ServerTransport (injected)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire shape
//!
//! A packet is `{name, payload}`. If `name` is [`Signal::PACKET_NAME`] the
//! payload is `{"name": "<signal>"}`; otherwise `name` is a
//! [`Dto::TYPE_NAME`] and the payload is that DTO as JSON. Both ends must
//! agree on type names and shapes; there is no versioning.
//!
//! ## Threading
//!
//! Everything runs to completion on the caller's thread. Buses take no
//! locks: mutation needs `&mut`, and a transport that calls `receive` from
//! several threads must serialize those calls itself. Handlers run in
//! registration order; a panicking handler unwinds into the caller of
//! `receive` and the remaining handlers for that packet do not run.

extern crate self as network_bus;

pub mod client;
mod config;
mod dispatch;
mod endpoint;
mod error;
mod model;
pub mod registrar;
pub mod server;
mod transport;

pub use client::{ClientBus, DtoHandler, SignalHandler};
pub use config::{BusConfig, DecodeFailurePolicy};
pub use dispatch::{Dispatch, DropReason};
pub use endpoint::Endpoint;
pub use error::{BusError, Result, TransportError};
pub use model::{Dto, Packet, Signal};
pub use registrar::{DtoRoute, HandlerId, Multicast, Registrar};
pub use server::{PeerDtoHandler, PeerSignalHandler, ServerBus};
pub use transport::{
    ClientTransport, Delivery, InMemoryClientTransport, InMemoryServerTransport, ServerTransport,
};

// Derive macro for `Dto`
pub use network_bus_macros::Dto;
