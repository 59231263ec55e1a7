use crate::crypto::error::{CryptoEngineFault, VerificationFailure};
use crate::model::{NodeIdentity, SignerId};
use ed25519_dalek::{Signature, Signer, VerifyingKey};

/// A signature primitive.
///
/// Methods take `&mut self` and the trait does not require `Sync`: implementations
/// may wrap native code that must never be entered twice at once.
pub trait SignatureScheme: Send + 'static {
    fn name(&self) -> &'static str;

    fn sign(
        &mut self,
        identity: &NodeIdentity,
        payload: &[u8],
    ) -> Result<Vec<u8>, CryptoEngineFault>;

    fn verify(
        &mut self,
        signer: &SignerId,
        payload: &[u8],
        signature: &[u8],
    ) -> Result<(), VerificationFailure>;
}

/// Ed25519 with strict verification (rejects small-order keys and malleable signatures).
#[derive(Debug, Default, Clone, Copy)]
pub struct Ed25519Scheme;

impl SignatureScheme for Ed25519Scheme {
    fn name(&self) -> &'static str {
        "ed25519"
    }

    fn sign(
        &mut self,
        identity: &NodeIdentity,
        payload: &[u8],
    ) -> Result<Vec<u8>, CryptoEngineFault> {
        Ok(identity.signing_key().sign(payload).to_bytes().to_vec())
    }

    fn verify(
        &mut self,
        signer: &SignerId,
        payload: &[u8],
        signature: &[u8],
    ) -> Result<(), VerificationFailure> {
        let key = VerifyingKey::from_bytes(signer.as_bytes())
            .map_err(|_| VerificationFailure::InvalidSigner)?;
        let signature =
            Signature::from_slice(signature).map_err(|_| VerificationFailure::MalformedSignature)?;
        key.verify_strict(payload, &signature)
            .map_err(|_| VerificationFailure::BadSignature)
    }
}
