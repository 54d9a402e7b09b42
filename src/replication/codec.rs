//! Wire codec for everything that crosses the transport boundary.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::TransportError;

/// Encode a value with bincode.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, TransportError> {
    Ok(bincode::serialize(value)?)
}

/// Decode a value with bincode.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, TransportError> {
    Ok(bincode::deserialize(bytes)?)
}
