use crate::intake_actor::IntakeRejection;
use std::sync::atomic::{AtomicU64, Ordering};

/// Intake counters, shared between the actor and its handles.
#[derive(Debug, Default)]
pub struct IntakeStats {
    received: AtomicU64,
    delivered: AtomicU64,
    dead_lettered: AtomicU64,
    malformed_encoding: AtomicU64,
    verification_failure: AtomicU64,
    malformed_routing_envelope: AtomicU64,
    unresolved_destination: AtomicU64,
    abandoned: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntakeSnapshot {
    pub received: u64,
    pub delivered: u64,
    pub dead_lettered: u64,
    pub malformed_encoding: u64,
    pub verification_failure: u64,
    pub malformed_routing_envelope: u64,
    pub unresolved_destination: u64,
    /// Accepted packets the node could not process (shutting down, crypto worker gone).
    pub abandoned: u64,
}

impl IntakeSnapshot {
    pub fn dropped(&self) -> u64 {
        self.malformed_encoding
            + self.verification_failure
            + self.malformed_routing_envelope
            + self.unresolved_destination
    }

    /// Packets that reached a final outcome.
    pub fn settled(&self) -> u64 {
        self.delivered + self.dead_lettered + self.dropped() + self.abandoned
    }
}

impl IntakeStats {
    pub(crate) fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dead_lettered(&self) {
        self.dead_lettered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_abandoned(&self) {
        self.abandoned.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejection(&self, rejection: &IntakeRejection) {
        let counter = match rejection {
            IntakeRejection::MalformedEncoding => &self.malformed_encoding,
            IntakeRejection::VerificationFailure(_) => &self.verification_failure,
            IntakeRejection::MalformedRoutingEnvelope => &self.malformed_routing_envelope,
            IntakeRejection::UnresolvedDestination(_) => &self.unresolved_destination,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> IntakeSnapshot {
        IntakeSnapshot {
            received: self.received.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            dead_lettered: self.dead_lettered.load(Ordering::Relaxed),
            malformed_encoding: self.malformed_encoding.load(Ordering::Relaxed),
            verification_failure: self.verification_failure.load(Ordering::Relaxed),
            malformed_routing_envelope: self.malformed_routing_envelope.load(Ordering::Relaxed),
            unresolved_destination: self.unresolved_destination.load(Ordering::Relaxed),
            abandoned: self.abandoned.load(Ordering::Relaxed),
        }
    }
}
