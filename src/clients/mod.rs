//! Typed wrappers that turn raw service suspensions into the relay's operations.

pub mod crypto_client;
pub mod secure_sender;

pub use crypto_client::*;
pub use secure_sender::*;
