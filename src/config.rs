//! Bus configuration.

use serde::Deserialize;

/// What a bus does with a payload whose packet name matches a registered
/// DTO type but whose body does not decode into that type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeFailurePolicy {
    /// Return [`BusError::Decode`](crate::BusError::Decode) from `receive`.
    /// A name match means the receiver expected that shape.
    #[default]
    Propagate,
    /// Drop the packet like an unknown type and report it as
    /// [`DropReason::UndecodableDto`](crate::DropReason::UndecodableDto).
    Drop,
}

/// Settings shared by client and server buses.
///
/// ```
/// use network_bus::{BusConfig, DecodeFailurePolicy};
///
/// let config: BusConfig = serde_json::from_str(r#"{"decode_failure":"drop"}"#).unwrap();
/// assert_eq!(config.decode_failure, DecodeFailurePolicy::Drop);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    pub decode_failure: DecodeFailurePolicy,
}

impl BusConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy for undecodable DTO payloads.
    pub fn with_decode_failure(mut self, policy: DecodeFailurePolicy) -> Self {
        self.decode_failure = policy;
        self
    }
}
