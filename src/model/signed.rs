use crate::codec::{self, CodecError};
use crate::model::address::Address;
use crate::model::identity::SignerId;
use crate::model::message::RoutingTuple;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An authenticated payload, as produced by signing and as carried on the wire.
///
/// `payload` is the encoded [`RoutingTuple`]; the signature covers exactly those bytes.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedMessage {
    payload: Vec<u8>,
    signature: Vec<u8>,
    signer: SignerId,
}

impl SignedMessage {
    pub fn from_parts(payload: Vec<u8>, signature: Vec<u8>, signer: SignerId) -> Self {
        Self {
            payload,
            signature,
            signer,
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn signer(&self) -> &SignerId {
        &self.signer
    }

    pub fn into_parts(self) -> (Vec<u8>, Vec<u8>, SignerId) {
        (self.payload, self.signature, self.signer)
    }

    /// Wire bytes of this message.
    pub fn to_wire(&self, max_bytes: usize) -> Result<Vec<u8>, CodecError> {
        codec::encode(self, max_bytes)
    }
}

impl fmt::Debug for SignedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedMessage")
            .field("payload_len", &self.payload.len())
            .field("signature_len", &self.signature.len())
            .field("signer", &self.signer)
            .finish()
    }
}

/// A payload whose signature has been checked. Only the crypto engine creates these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated {
    signer: SignerId,
    payload: Vec<u8>,
}

impl Authenticated {
    pub(crate) fn new(signer: SignerId, payload: Vec<u8>) -> Self {
        Self { signer, payload }
    }

    pub fn signer(&self) -> &SignerId {
        &self.signer
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Interpret the authenticated bytes as a routing tuple.
    pub fn routing_tuple(&self, max_bytes: usize) -> Result<RoutingTuple, CodecError> {
        codec::decode(&self.payload, max_bytes)
    }
}

/// Routing wrapper for one outbound send: the resolved endpoint and what goes to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    destination: Address,
    signed: SignedMessage,
}

impl Envelope {
    pub fn new(destination: Address, signed: SignedMessage) -> Self {
        Self {
            destination,
            signed,
        }
    }

    pub fn destination(&self) -> &Address {
        &self.destination
    }

    pub fn signed(&self) -> &SignedMessage {
        &self.signed
    }
}
