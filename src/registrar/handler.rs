use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Identity of a registered callback.
///
/// Two registrations share an id when they were made with clones of the
/// same `Arc`, so `forget` with that `Arc` finds them again. Separately
/// allocated closures never compare equal, even if their bodies match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

impl HandlerId {
    pub fn of<F: ?Sized>(handler: &Arc<F>) -> Self {
        Self(Arc::as_ptr(handler) as *const () as usize)
    }
}

/// Ordered list of callbacks registered under one key.
///
/// Adding appends; removing drops the first entry with a matching id.
/// Duplicates are kept and each fires once per invocation.
pub struct Multicast<F: ?Sized> {
    handlers: Vec<(HandlerId, Box<F>)>,
}

impl<F: ?Sized> Multicast<F> {
    pub(crate) fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, id: HandlerId, handler: Box<F>) {
        self.handlers.push((id, handler));
    }

    /// Remove one registration of `id`. Returns `false` if none was found.
    pub(crate) fn remove(&mut self, id: HandlerId) -> bool {
        match self.handlers.iter().position(|(existing, _)| *existing == id) {
            Some(index) => {
                self.handlers.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registration ids in invocation order.
    pub fn ids(&self) -> impl Iterator<Item = HandlerId> + '_ {
        self.handlers.iter().map(|(id, _)| *id)
    }
}

impl<C: ?Sized> Multicast<dyn Fn(&C) + Send + Sync> {
    /// Call every handler in registration order. Returns the number called.
    pub fn invoke(&self, ctx: &C) -> usize {
        for (_, handler) in &self.handlers {
            handler(ctx);
        }
        self.handlers.len()
    }
}

impl<C: ?Sized> Multicast<dyn Fn(&C, &dyn Any) + Send + Sync> {
    /// Call every handler in registration order with a decoded payload.
    pub fn invoke_with(&self, ctx: &C, dto: &dyn Any) -> usize {
        for (_, handler) in &self.handlers {
            handler(ctx, dto);
        }
        self.handlers.len()
    }
}

impl<F: ?Sized> fmt::Debug for Multicast<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}
