mod dto;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Dto)] derive macro
// ============================================================================

/// Derive macro for the `Dto` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Serialize, Deserialize, Dto)]
/// #[dto(name = "PlayerMoved")]
/// struct PlayerMoved {
///     pub x: i32,
///     pub y: i32,
/// }
/// ```
///
/// - `#[dto(name = "...")]` sets the wire type name carried in
///   `Packet::name`. If omitted, defaults to the type identifier.
///
/// Both ends of a connection must agree on the name, so prefer setting it
/// explicitly for types that may be renamed.
#[proc_macro_derive(Dto, attributes(dto))]
pub fn derive_dto(input: TokenStream) -> TokenStream {
    dto::derive_dto(input)
}
