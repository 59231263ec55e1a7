//! # Routing Collaborators
//!
//! Two lookups sit at the edges of the pipelines:
//!
//! - [`RouteResolver`]: logical destination → local delivery target (intake side).
//! - [`AddressResolver`]: logical destination → physical socket (send side),
//!   translating simulated endpoints to real ones on the way.
//!
//! Both are pure functions of the destination id; message content never affects
//! where a message goes.

pub mod address_book;
pub mod dead_letter;
pub mod directory;

pub use address_book::*;
pub use dead_letter::*;
pub use directory::*;
