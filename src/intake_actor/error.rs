//! Why an inbound packet was dropped.

use crate::crypto::VerificationFailure;
use crate::model::LogicalAddress;
use thiserror::Error;

/// Terminal outcome of a packet that did not make it through intake.
///
/// Every variant is an expected result of untrusted input. None of them is ever
/// reported back to the sender.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeRejection {
    /// The bytes are not a signed message.
    #[error("Malformed encoding")]
    MalformedEncoding,

    #[error("Verification failed: {0}")]
    VerificationFailure(#[from] VerificationFailure),

    /// Authentic, but the payload is not a routing tuple.
    #[error("Malformed routing envelope")]
    MalformedRoutingEnvelope,

    #[error("Unresolved destination: {0}")]
    UnresolvedDestination(LogicalAddress),
}

impl IntakeRejection {
    /// Stable label for logs.
    pub fn reason(&self) -> &'static str {
        match self {
            IntakeRejection::MalformedEncoding => "malformed_encoding",
            IntakeRejection::VerificationFailure(_) => "verification_failure",
            IntakeRejection::MalformedRoutingEnvelope => "malformed_routing_envelope",
            IntakeRejection::UnresolvedDestination(_) => "unresolved_destination",
        }
    }
}
