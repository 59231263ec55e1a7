//! Error types of the crypto boundary.

use thiserror::Error;

/// Why a candidate message was not accepted as authentic.
///
/// This is an expected outcome for malformed or forged input, not an exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerificationFailure {
    /// The claimed signer is not a valid public key.
    #[error("Invalid signer key")]
    InvalidSigner,

    /// The signature bytes do not have the shape of a signature.
    #[error("Malformed signature")]
    MalformedSignature,

    /// Well-formed, but does not authenticate the payload.
    #[error("Signature mismatch")]
    BadSignature,
}

/// The engine failed on a request that should have succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Crypto engine fault: {0}")]
pub struct CryptoEngineFault(pub String);
