//! Handler registry — signal names and DTO types to multicast handlers.
//!
//! A `Registrar<C>` owns two independent namespaces:
//!
//! - signal handlers, keyed by signal name
//! - DTO handlers, keyed by Rust type and looked up from the wire by
//!   [`Dto::TYPE_NAME`]
//!
//! `C` is the dispatch context handed to every handler: `()` on a client
//! bus, the sender id (`str`) on a server bus.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use network_bus::{HandlerId, Registrar};
//!
//! let hits = Arc::new(AtomicUsize::new(0));
//! let handler = {
//!     let hits = Arc::clone(&hits);
//!     Arc::new(move |_: &()| {
//!         hits.fetch_add(1, Ordering::SeqCst);
//!     })
//! };
//!
//! let mut registrar: Registrar<()> = Registrar::new();
//! registrar.add_signal_handler("Ping", HandlerId::of(&handler), Box::new({
//!     let handler = Arc::clone(&handler);
//!     move |ctx: &()| handler(ctx)
//! }));
//!
//! registrar.signal_handlers("Ping").unwrap().invoke(&());
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

mod handler;
mod route;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

pub use handler::{HandlerId, Multicast};
pub use route::DtoRoute;

use crate::model::{Dto, Signal};

/// Handler registry owned by a single bus.
pub struct Registrar<C: ?Sized> {
    signals: HashMap<String, Multicast<dyn Fn(&C) + Send + Sync>>,
    // Registration order; name lookup returns the first match.
    dtos: Vec<DtoRoute<C>>,
}

impl<C: ?Sized> Default for Registrar<C> {
    fn default() -> Self {
        Self {
            signals: HashMap::new(),
            dtos: Vec::new(),
        }
    }
}

impl<C: ?Sized + 'static> Registrar<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler for `signal_name`, creating the entry if needed.
    pub fn add_signal_handler(
        &mut self,
        signal_name: &str,
        id: HandlerId,
        handler: Box<dyn Fn(&C) + Send + Sync>,
    ) {
        self.signals
            .entry(signal_name.to_string())
            .or_insert_with(Multicast::new)
            .push(id, handler);
    }

    /// Append a handler for DTO type `T`, creating the route if needed.
    pub fn add_dto_handler<T: Dto>(&mut self, id: HandlerId, handler: Box<dyn Fn(&C, &T) + Send + Sync>) {
        let type_id = TypeId::of::<T>();
        let index = match self.dtos.iter().position(|r| r.type_id() == type_id) {
            Some(index) => index,
            None => {
                if T::TYPE_NAME == Signal::PACKET_NAME {
                    tracing::warn!(
                        type_name = T::TYPE_NAME,
                        "DTO type name is reserved for signals; this handler will never fire"
                    );
                }
                if let Some(existing) = self.dto_route(T::TYPE_NAME) {
                    tracing::warn!(
                        type_name = T::TYPE_NAME,
                        existing = ?existing.type_id(),
                        "DTO type name already registered by another type; inbound packets route to the first"
                    );
                }
                self.dtos.push(DtoRoute::new::<T>());
                self.dtos.len() - 1
            }
        };

        let erased = move |ctx: &C, dto: &dyn Any| {
            if let Some(dto) = dto.downcast_ref::<T>() {
                handler(ctx, dto);
            }
        };
        self.dtos[index].handlers_mut().push(id, Box::new(erased));
    }

    /// Remove one registration of `id` for `signal_name`.
    ///
    /// Returns `false` (and changes nothing) if it was not registered.
    pub fn remove_signal_handler(&mut self, signal_name: &str, id: HandlerId) -> bool {
        let Some(handlers) = self.signals.get_mut(signal_name) else {
            return false;
        };
        let removed = handlers.remove(id);
        if handlers.is_empty() {
            self.signals.remove(signal_name);
        }
        removed
    }

    /// Remove one registration of `id` for DTO type `T`.
    pub fn remove_dto_handler<T: Dto>(&mut self, id: HandlerId) -> bool {
        let type_id = TypeId::of::<T>();
        let Some(index) = self.dtos.iter().position(|r| r.type_id() == type_id) else {
            return false;
        };
        let removed = self.dtos[index].handlers_mut().remove(id);
        if self.dtos[index].handlers().is_empty() {
            self.dtos.remove(index);
        }
        removed
    }

    /// Handlers registered for `signal_name`, if any.
    pub fn signal_handlers(&self, signal_name: &str) -> Option<&Multicast<dyn Fn(&C) + Send + Sync>> {
        self.signals.get(signal_name)
    }

    /// Resolve a wire type name to its route.
    ///
    /// If two registered types share a name, the one registered first wins.
    pub fn dto_route(&self, type_name: &str) -> Option<&DtoRoute<C>> {
        self.dtos.iter().find(|r| r.type_name() == type_name)
    }

    /// Remove every signal and DTO registration.
    pub fn clear(&mut self) {
        self.signals.clear();
        self.dtos.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty() && self.dtos.is_empty()
    }

    /// Signal names with at least one handler.
    pub fn signal_names(&self) -> Vec<&str> {
        self.signals.keys().map(|s| s.as_str()).collect()
    }

    /// DTO type names with at least one handler, in registration order.
    pub fn dto_type_names(&self) -> Vec<&'static str> {
        self.dtos.iter().map(|r| r.type_name()).collect()
    }
}

impl<C: ?Sized> fmt::Debug for Registrar<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registrar")
            .field("signals", &self.signals)
            .field("dtos", &self.dtos)
            .finish()
    }
}
