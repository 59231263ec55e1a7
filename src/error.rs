//! Top-level error type of the relay.
//!
//! Only faults surface here. Rejected input never becomes a `RelayError`; see
//! [`IntakeRejection`](crate::intake_actor::IntakeRejection).

use crate::codec::CodecError;
use crate::config::ConfigError;
use actor_framework::FrameworkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Framework(#[from] FrameworkError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Neither a transmitter nor a bind address was configured.
    #[error("No transmitter available")]
    NoTransmitter,

    #[error("Shutdown did not finish within {0:?}")]
    ShutdownTimedOut(std::time::Duration),
}
