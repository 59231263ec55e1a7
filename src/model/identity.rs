//! Node identities.
//!
//! A [`NodeIdentity`] is passed explicitly to every signing request; there is no
//! ambient, process-wide key. Key management and rotation are left to the caller.

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a signer's public key in bytes.
pub const SIGNER_ID_LEN: usize = 32;

/// Public half of a node identity, as carried on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignerId([u8; SIGNER_ID_LEN]);

impl SignerId {
    pub fn from_bytes(bytes: [u8; SIGNER_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNER_ID_LEN] {
        &self.0
    }
}

impl fmt::Display for SignerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 8 bytes are enough to tell nodes apart in logs.
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for SignerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignerId({self})")
    }
}

/// A node's signing keypair.
pub struct NodeIdentity {
    signing_key: SigningKey,
}

impl NodeIdentity {
    /// Fresh identity from the operating system's RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic identity from a 32-byte secret seed.
    pub fn from_secret_bytes(secret: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(secret),
        }
    }

    pub fn signer_id(&self) -> SignerId {
        SignerId(self.signing_key.verifying_key().to_bytes())
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl fmt::Debug for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeIdentity")
            .field("signer", &self.signer_id())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_never_prints_secret() {
        let secret = [7u8; 32];
        let identity = NodeIdentity::from_secret_bytes(&secret);
        let rendered = format!("{identity:?}");
        assert!(rendered.contains("SignerId("));
        assert!(!rendered.contains("0707070707"));
    }

    #[test]
    fn test_same_seed_same_signer() {
        let a = NodeIdentity::from_secret_bytes(&[1u8; 32]);
        let b = NodeIdentity::from_secret_bytes(&[1u8; 32]);
        let c = NodeIdentity::generate();
        assert_eq!(a.signer_id(), b.signer_id());
        assert_ne!(a.signer_id(), c.signer_id());
    }
}
