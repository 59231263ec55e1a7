//! # Framework Errors
//!
//! This module defines the error types used throughout the actor framework.
//! Every variant is a scheduler-level fault: a dead actor, a dead service, or a
//! broken continuation invariant. Business failures belong to the actor that
//! resumes, never to the framework.

use crate::actor::ActorId;
use crate::continuation::ContinuationHandle;

/// Errors that can occur within the actor framework itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameworkError {
    /// The actor's mailbox is closed (the actor has terminated).
    #[error("Actor closed: {0}")]
    ActorClosed(ActorId),

    /// The serialized service worker is no longer accepting requests.
    #[error("Service closed: {0}")]
    ServiceClosed(String),

    /// A continuation was resumed after it had already been resumed, cancelled or expired.
    #[error("Continuation {handle} resumed twice")]
    DoubleResume { handle: ContinuationHandle },

    /// A result arrived for a continuation that was cancelled or expired. Expected,
    /// not a defect.
    #[error("Continuation {handle} was reclaimed before its result arrived")]
    ContinuationReclaimed { handle: ContinuationHandle },

    /// A handle that this registry never issued.
    #[error("Unknown continuation {handle}")]
    UnknownContinuation { handle: ContinuationHandle },

    /// The service worker thread could not be started or panicked.
    #[error("Service worker failed: {0}")]
    WorkerFailed(String),
}
