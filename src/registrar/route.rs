use std::any::{Any, TypeId};
use std::fmt;

use super::Multicast;
use crate::model::Dto;

/// Routing entry for one DTO type: its identity, a typed decoder, and the
/// handlers to fan the decoded value out to.
///
/// The decoder and the handler wrappers are fixed at registration, so
/// dispatch never needs to know `T` to call them.
pub struct DtoRoute<C: ?Sized> {
    type_id: TypeId,
    type_name: &'static str,
    decode: fn(&str) -> serde_json::Result<Box<dyn Any>>,
    handlers: Multicast<dyn Fn(&C, &dyn Any) + Send + Sync>,
}

impl<C: ?Sized> DtoRoute<C> {
    pub(crate) fn new<T: Dto>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: T::TYPE_NAME,
            decode: decode_as::<T>,
            handlers: Multicast::new(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn handlers(&self) -> &Multicast<dyn Fn(&C, &dyn Any) + Send + Sync> {
        &self.handlers
    }

    pub(crate) fn handlers_mut(&mut self) -> &mut Multicast<dyn Fn(&C, &dyn Any) + Send + Sync> {
        &mut self.handlers
    }

    /// Decode a payload into this route's type.
    pub fn decode(&self, payload: &str) -> serde_json::Result<Box<dyn Any>> {
        (self.decode)(payload)
    }

    /// Fan a decoded value out to every handler. Returns the number called.
    pub fn invoke(&self, ctx: &C, dto: &dyn Any) -> usize {
        self.handlers.invoke_with(ctx, dto)
    }
}

impl<C: ?Sized> fmt::Debug for DtoRoute<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DtoRoute")
            .field("type_name", &self.type_name)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

fn decode_as<T: Dto>(payload: &str) -> serde_json::Result<Box<dyn Any>> {
    let dto: T = serde_json::from_str(payload)?;
    Ok(Box::new(dto))
}
