//! Pure data structures shared by the send and intake pipelines.
//!
//! Everything in here is immutable once built: fields are private and there are
//! no setters. Wire-visible types derive `serde` so the [`codec`](crate::codec)
//! can carry them.

pub mod address;
pub mod identity;
pub mod message;
pub mod signed;

pub use address::*;
pub use identity::*;
pub use message::*;
pub use signed::*;
