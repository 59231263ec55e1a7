//! # Secure Relay
//!
//! > **Authenticated actor-to-actor messaging over datagrams.**
//!
//! An actor on one node calls [`SecureSender::send`](clients::SecureSender::send) with
//! a logical destination and a message. The pair is signed with the node's
//! identity, written to the wire, and transmitted best effort. On the receiving
//! node every datagram goes through the intake pipeline (decode, verify,
//! destructure, route), and only authentic messages for a locally hosted actor
//! reach a mailbox.
//!
//! ## 🏗️ Design
//!
//! ### 1. The crypto engine is single-threaded
//! Signing and verification run on **one** dedicated worker thread
//! ([`actor_framework::ServiceWorker`]). Nobody calls the engine directly. Actors
//! *suspend* on it and the result is resumed back into their own mailbox, so a
//! resumption never runs on the worker thread and never races with the actor's
//! other messages.
//!
//! ### 2. Bad input is data, not an error
//! Garbage, forged, and misaddressed packets are dropped at the stage that spots
//! them. They become an [`IntakeRejection`](intake_actor::IntakeRejection), get
//! counted, and are logged at `trace` at most. No reply is ever sent. Faults
//! (the engine failing, a continuation resumed twice) are reported at `error`.
//!
//! ### 3. Explicit identity
//! Every signing request carries the [`NodeIdentity`](model::NodeIdentity) to sign
//! with. There is no process-wide key.
//!
//! ### 4. No ordering across sends
//! Two sends from the same actor queue independently at the crypto worker and
//! may hit the wire in either order. Callers that need order sequence it
//! themselves.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`] - addresses, messages, identities, signed messages
//! - [`codec`] - the one set of `bincode` options used for everything on the wire
//! - [`crypto`] - signature scheme and the engine service
//! - [`clients`] - [`CryptoClient`](clients::CryptoClient) and [`SecureSender`](clients::SecureSender)
//! - [`intake_actor`] - the inbound pipeline
//! - [`routing`] - logical → local actor, logical → socket
//! - [`transport`] - UDP and in-memory transmit/receive
//! - [`config`], [`lifecycle`] - running a node
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Two in-process nodes exchange a signed ping
//! RUST_LOG=info cargo run
//!
//! cargo test
//! ```

pub mod clients;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod intake_actor;
pub mod lifecycle;
pub mod model;
pub mod routing;
pub mod transport;

pub use error::RelayError;
