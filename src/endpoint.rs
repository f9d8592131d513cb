//! State shared by every bus variant.

use crate::config::BusConfig;
use crate::dispatch::{self, Dispatch};
use crate::error::Result;
use crate::model::Packet;
use crate::registrar::Registrar;

/// A bus's attachment to its transport: the transport itself, whether the
/// bus is listening to it, and the handlers it dispatches to.
///
/// Each bus owns exactly one `Endpoint`; registrars are never shared.
#[derive(Debug)]
pub struct Endpoint<T, C: ?Sized> {
    transport: T,
    opened: bool,
    registrar: Registrar<C>,
    config: BusConfig,
}

impl<T, C: ?Sized + 'static> Endpoint<T, C> {
    /// Bind to a transport. Starts open.
    pub fn new(transport: T, config: BusConfig) -> Self {
        Self {
            transport,
            opened: true,
            registrar: Registrar::new(),
            config,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn registrar(&self) -> &Registrar<C> {
        &self.registrar
    }

    pub fn registrar_mut(&mut self) -> &mut Registrar<C> {
        &mut self.registrar
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    /// Start listening to the transport again. No-op if already open.
    pub fn open(&mut self) {
        if self.opened {
            return;
        }
        self.opened = true;
        tracing::debug!("bus opened");
    }

    /// Stop listening to the transport. No-op if already closed.
    ///
    /// With `remove_handlers`, every registration is cleared as well.
    pub fn close(&mut self, remove_handlers: bool) {
        if !self.opened {
            return;
        }
        if remove_handlers {
            self.registrar.clear();
        }
        self.opened = false;
        tracing::debug!(remove_handlers, "bus closed");
    }

    /// Detach from the current transport, bind to `transport`, and open.
    ///
    /// Registrations are kept. Returns the previous transport.
    pub fn change_transport(&mut self, transport: T) -> T {
        self.close(false);
        let previous = std::mem::replace(&mut self.transport, transport);
        self.open();
        previous
    }

    /// Dispatch an inbound packet, unless the bus is closed.
    pub fn receive(&self, ctx: &C, packet: &Packet) -> Result<Dispatch> {
        if !self.opened {
            tracing::debug!(packet = %packet.name, "bus closed, ignoring packet");
            return Ok(Dispatch::Detached);
        }
        dispatch::dispatch(&self.registrar, ctx, packet, self.config.decode_failure)
    }
}
