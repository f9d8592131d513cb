//! Receive-side dispatch shared by client and server buses.
//!
//! One inbound packet is decoded once and fanned out to every matching
//! handler, synchronously and in registration order. Handler panics are
//! not caught; they unwind into whoever called `receive`.

use crate::config::DecodeFailurePolicy;
use crate::error::{BusError, Result};
use crate::model::{Packet, Signal};
use crate::registrar::Registrar;

/// What happened to an inbound packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A signal packet; `handlers` may be zero.
    Signal { name: String, handlers: usize },
    /// A DTO packet that matched a registered type.
    Dto {
        type_name: &'static str,
        handlers: usize,
    },
    /// The packet was ignored.
    Dropped(DropReason),
    /// The bus is closed and not listening to its transport.
    Detached,
}

impl Dispatch {
    /// Number of handlers invoked.
    pub fn handlers(&self) -> usize {
        match self {
            Dispatch::Signal { handlers, .. } | Dispatch::Dto { handlers, .. } => *handlers,
            Dispatch::Dropped(_) | Dispatch::Detached => 0,
        }
    }
}

/// Why a packet was dropped without invoking handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Signal packet whose payload is not a signal.
    MalformedSignal,
    /// No handler is registered for this packet name.
    UnknownType(String),
    /// Payload did not decode into the registered type and the bus is
    /// configured with [`DecodeFailurePolicy::Drop`].
    UndecodableDto(String),
}

/// Route `packet` through `registrar`, passing `ctx` to every handler.
pub(crate) fn dispatch<C: ?Sized + 'static>(
    registrar: &Registrar<C>,
    ctx: &C,
    packet: &Packet,
    policy: DecodeFailurePolicy,
) -> Result<Dispatch> {
    if packet.is_signal() {
        let signal: Signal = match serde_json::from_str(&packet.payload) {
            Ok(signal) => signal,
            Err(e) => {
                tracing::debug!(error = %e, "dropping malformed signal packet");
                return Ok(Dispatch::Dropped(DropReason::MalformedSignal));
            }
        };

        let handlers = registrar
            .signal_handlers(&signal.name)
            .map_or(0, |handlers| handlers.invoke(ctx));
        tracing::trace!(signal = %signal.name, handlers, "dispatched signal");

        return Ok(Dispatch::Signal {
            name: signal.name,
            handlers,
        });
    }

    let Some(route) = registrar.dto_route(&packet.name) else {
        tracing::debug!(packet = %packet.name, "no handlers for packet, dropping");
        return Ok(Dispatch::Dropped(DropReason::UnknownType(packet.name.clone())));
    };

    let dto = match route.decode(&packet.payload) {
        Ok(dto) => dto,
        Err(source) => match policy {
            DecodeFailurePolicy::Propagate => {
                return Err(BusError::Decode {
                    type_name: route.type_name().to_string(),
                    source,
                });
            }
            DecodeFailurePolicy::Drop => {
                tracing::debug!(
                    type_name = route.type_name(),
                    error = %source,
                    "dropping undecodable DTO payload"
                );
                return Ok(Dispatch::Dropped(DropReason::UndecodableDto(
                    route.type_name().to_string(),
                )));
            }
        },
    };

    let handlers = route.invoke(ctx, &*dto);
    tracing::trace!(type_name = route.type_name(), handlers, "dispatched DTO");

    Ok(Dispatch::Dto {
        type_name: route.type_name(),
        handlers,
    })
}
