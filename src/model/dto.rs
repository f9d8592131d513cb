use serde::{de::DeserializeOwned, Serialize};

/// Trait for typed payloads carried on the bus.
///
/// `TYPE_NAME` is written into [`Packet::name`](crate::Packet) on send and
/// is the only key used to route an inbound packet to its handlers, so it
/// must be stable and agreed on by both ends out of band. Usually derived:
///
/// ```
/// use network_bus::Dto;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, Dto)]
/// #[dto(name = "ChatMessage")]
/// struct Chat {
///     text: String,
/// }
///
/// assert_eq!(Chat::TYPE_NAME, "ChatMessage");
/// ```
pub trait Dto: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The wire type name for this payload type (e.g., "PlayerMoved").
    const TYPE_NAME: &'static str;
}
