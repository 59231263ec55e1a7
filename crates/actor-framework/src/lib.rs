//! # Actor Framework
//!
//! This crate provides the scheduling core of the relay: actors with strictly
//! ordered mailboxes, and a suspend/resume mechanism that lets any actor hand work
//! to a single-threaded service and carry on, with the result delivered back into
//! that actor's own turn loop.
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into three layers:
//!
//! 1. **Actor Layer** ([`Actor`], [`Context`]) - Your state and message handling
//! 2. **Runtime Layer** ([`Mailbox`], [`spawn`]) - Sequential processing of messages and resumptions
//! 3. **Deferral Layer** ([`ContinuationRegistry`], [`ServiceWorker`], [`ServiceClient`]) - Non-blocking calls into serialized services
//!
//! ## Continuation-Passing Without Blocking
//!
//! ```text
//!   actor turn                 service worker thread          actor turn (later)
//!   ──────────                 ─────────────────────          ──────────────────
//!   client.suspend(req, k) ──► queue ──► service.call(req)
//!   (returns immediately)                registry.resume(h, r) ──► mailbox ──► k(state, ctx, r)
//! ```
//!
//! A continuation is resumed at most once; resuming it again is reported as
//! [`FrameworkError::DoubleResume`]. A continuation that is never resumed stays
//! pending until it is cancelled or expired explicitly.
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task
//! - Items are processed **sequentially** within an actor (no locks needed!)
//! - Multiple actors run in **parallel** on the Tokio worker pool
//! - Each [`Service`] is owned by **one** dedicated thread and never called concurrently
//!
//! ## Testing
//!
//! The [`mock`] module provides [`MockService`](mock::MockService), a scripted service
//! that runs on a real worker so suspension paths can be tested with injected faults.

pub mod actor;
pub mod client;
pub mod continuation;
pub mod error;
pub mod mailbox;
pub mod message;
pub mod mock;
pub mod service;

// Re-export core types for convenience
pub use actor::{Actor, ActorId, Context};
pub use client::{ActorRef, Recipient};
pub use continuation::{ContinuationHandle, ContinuationRegistry};
pub use error::FrameworkError;
pub use mailbox::{spawn, Mailbox};
pub use message::{MailboxItem, Resumption};
pub use service::{Service, ServiceClient, ServiceWorker};
