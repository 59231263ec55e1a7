use crate::crypto::error::{CryptoEngineFault, VerificationFailure};
use crate::crypto::scheme::SignatureScheme;
use crate::model::{Authenticated, NodeIdentity, SignedMessage};
use actor_framework::Service;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, trace};

/// A request to the crypto engine.
pub enum CryptoRequest {
    Sign {
        identity: Arc<NodeIdentity>,
        payload: Vec<u8>,
    },
    Verify {
        candidate: SignedMessage,
    },
}

impl Clone for CryptoRequest {
    fn clone(&self) -> Self {
        match self {
            CryptoRequest::Sign { identity, payload } => CryptoRequest::Sign {
                identity: identity.clone(),
                payload: payload.clone(),
            },
            CryptoRequest::Verify { candidate } => CryptoRequest::Verify {
                candidate: candidate.clone(),
            },
        }
    }
}

impl fmt::Debug for CryptoRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoRequest::Sign { identity, payload } => f
                .debug_struct("Sign")
                .field("signer", &identity.signer_id())
                .field("payload_len", &payload.len())
                .finish(),
            CryptoRequest::Verify { candidate } => f
                .debug_struct("Verify")
                .field("signer", candidate.signer())
                .finish(),
        }
    }
}

/// The engine's answer; the variant always matches the request kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoResponse {
    Signed(Result<SignedMessage, CryptoEngineFault>),
    Verified(Result<Authenticated, VerificationFailure>),
}

impl CryptoResponse {
    pub fn kind(&self) -> &'static str {
        match self {
            CryptoResponse::Signed(_) => "signed",
            CryptoResponse::Verified(_) => "verified",
        }
    }
}

/// Counters kept by the engine.
#[derive(Debug, Default)]
pub struct EngineStats {
    pub signed: AtomicU64,
    pub verified: AtomicU64,
    pub rejected: AtomicU64,
    pub faults: AtomicU64,
}

/// Point-in-time copy of [`EngineStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineSnapshot {
    pub signed: u64,
    pub verified: u64,
    pub rejected: u64,
    pub faults: u64,
}

impl EngineStats {
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            signed: self.signed.load(Ordering::Relaxed),
            verified: self.verified.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            faults: self.faults.load(Ordering::Relaxed),
        }
    }
}

/// The serialized signing/verification service.
pub struct CryptoEngine {
    scheme: Box<dyn SignatureScheme>,
    stats: Arc<EngineStats>,
}

impl CryptoEngine {
    pub fn new(scheme: impl SignatureScheme) -> Self {
        Self {
            scheme: Box::new(scheme),
            stats: Arc::new(EngineStats::default()),
        }
    }

    pub fn stats(&self) -> Arc<EngineStats> {
        self.stats.clone()
    }

    fn sign(&mut self, identity: &NodeIdentity, payload: Vec<u8>) -> Result<SignedMessage, CryptoEngineFault> {
        match self.scheme.sign(identity, &payload) {
            Ok(signature) => {
                self.stats.signed.fetch_add(1, Ordering::Relaxed);
                Ok(SignedMessage::from_parts(payload, signature, identity.signer_id()))
            }
            Err(fault) => {
                self.stats.faults.fetch_add(1, Ordering::Relaxed);
                error!(scheme = self.scheme.name(), error = %fault, "Signing failed");
                Err(fault)
            }
        }
    }

    fn verify(&mut self, candidate: SignedMessage) -> Result<Authenticated, VerificationFailure> {
        let (payload, signature, signer) = candidate.into_parts();
        match self.scheme.verify(&signer, &payload, &signature) {
            Ok(()) => {
                self.stats.verified.fetch_add(1, Ordering::Relaxed);
                Ok(Authenticated::new(signer, payload))
            }
            Err(failure) => {
                self.stats.rejected.fetch_add(1, Ordering::Relaxed);
                trace!(scheme = self.scheme.name(), reason = %failure, "Verification failed");
                Err(failure)
            }
        }
    }
}

impl Service for CryptoEngine {
    type Request = CryptoRequest;
    type Response = CryptoResponse;

    fn call(&mut self, request: CryptoRequest) -> CryptoResponse {
        match request {
            CryptoRequest::Sign { identity, payload } => {
                CryptoResponse::Signed(self.sign(&identity, payload))
            }
            CryptoRequest::Verify { candidate } => CryptoResponse::Verified(self.verify(candidate)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Ed25519Scheme;

    #[test]
    fn test_round_trip_through_engine() {
        let mut engine = CryptoEngine::new(Ed25519Scheme);
        let identity = Arc::new(NodeIdentity::from_secret_bytes(&[9u8; 32]));

        let CryptoResponse::Signed(Ok(signed)) = engine.call(CryptoRequest::Sign {
            identity: identity.clone(),
            payload: b"payload".to_vec(),
        }) else {
            panic!("expected a signed response");
        };
        assert_eq!(signed.signer(), &identity.signer_id());

        let CryptoResponse::Verified(Ok(authentic)) =
            engine.call(CryptoRequest::Verify { candidate: signed })
        else {
            panic!("expected a verified response");
        };
        assert_eq!(authentic.payload(), b"payload");
        assert_eq!(
            engine.stats().snapshot(),
            EngineSnapshot {
                signed: 1,
                verified: 1,
                rejected: 0,
                faults: 0
            }
        );
    }

    struct BrokenScheme;

    impl SignatureScheme for BrokenScheme {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn sign(&mut self, _: &NodeIdentity, _: &[u8]) -> Result<Vec<u8>, CryptoEngineFault> {
            Err(CryptoEngineFault("device unavailable".into()))
        }

        fn verify(&mut self, _: &crate::model::SignerId, _: &[u8], _: &[u8]) -> Result<(), VerificationFailure> {
            Err(VerificationFailure::BadSignature)
        }
    }

    #[test]
    fn test_fault_is_counted() {
        let mut engine = CryptoEngine::new(BrokenScheme);
        let response = engine.call(CryptoRequest::Sign {
            identity: Arc::new(NodeIdentity::generate()),
            payload: vec![],
        });
        assert_eq!(
            response,
            CryptoResponse::Signed(Err(CryptoEngineFault("device unavailable".into())))
        );
        assert_eq!(engine.stats().snapshot().faults, 1);
    }
}
