//! # Crypto Service Boundary
//!
//! The signing/verification engine is single-threaded: it must see one request at
//! a time no matter how many actors want it. This module packages it as a
//! [`Service`](actor_framework::Service) so that it is owned by one
//! [`ServiceWorker`](actor_framework::ServiceWorker) thread and reached only through
//! suspensions (see [`CryptoClient`](crate::clients::CryptoClient)).
//!
//! - [`SignatureScheme`] - the primitive itself (Ed25519 here; swappable)
//! - [`CryptoEngine`] - the service wrapping a scheme, with counters
//! - [`VerificationFailure`] - routine rejection of bad input
//! - [`CryptoEngineFault`] - the engine broke on a well-formed request

pub mod engine;
pub mod error;
pub mod scheme;

pub use engine::*;
pub use error::*;
pub use scheme::*;
