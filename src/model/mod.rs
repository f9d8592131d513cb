//! Wire data model: packets, signals, and the `Dto` tag trait.

mod dto;
mod packet;
mod signal;

pub use dto::Dto;
pub use packet::Packet;
pub use signal::Signal;
