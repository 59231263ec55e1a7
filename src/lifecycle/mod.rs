//! Node lifecycle and process-level setup.
//!
//! - [`RelayNode`] - starts, wires, and stops the pieces of one node
//! - [`setup_tracing`] - initializes logging for binaries

pub mod node;
pub mod tracing;

pub use node::*;
pub use self::tracing::*;
