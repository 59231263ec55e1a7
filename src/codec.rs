//! # Wire Codec
//!
//! All wire objects go through `bincode` with one fixed set of options so that
//! both sides agree on the framing:
//!
//! - fixed-width integers,
//! - a hard size limit (the largest datagram the node accepts),
//! - trailing bytes rejected.
//!
//! Decoding is total over arbitrary input: garbage yields
//! [`CodecError::Malformed`], never a panic and never an unbounded allocation.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Largest payload of a single UDP datagram over IPv4.
pub const MAX_UDP_DATAGRAM: usize = 65_507;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The bytes do not decode to the expected shape.
    #[error("Malformed encoding: {0}")]
    Malformed(String),

    /// The value could not be encoded (usually: larger than the limit).
    #[error("Encoding failed: {0}")]
    Encode(String),
}

fn options(max_bytes: usize) -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(max_bytes as u64)
}

pub fn encode<T: Serialize + ?Sized>(value: &T, max_bytes: usize) -> Result<Vec<u8>, CodecError> {
    options(max_bytes)
        .serialize(value)
        .map_err(|e| CodecError::Encode(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8], max_bytes: usize) -> Result<T, CodecError> {
    if bytes.len() > max_bytes {
        return Err(CodecError::Malformed(format!(
            "{} bytes exceeds limit of {}",
            bytes.len(),
            max_bytes
        )));
    }
    options(max_bytes)
        .deserialize(bytes)
        .map_err(|e| CodecError::Malformed(e.to_string()))
}
