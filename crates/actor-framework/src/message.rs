//! # Mailbox Items
//!
//! This module defines what travels through an actor's mailbox: application
//! messages and resumptions of suspended continuations.

use crate::actor::{Actor, Context};
use crate::continuation::ContinuationHandle;
use std::fmt;

/// Captured "resume here" logic, run against the actor's state inside its own turn.
pub type Resumption<A> = Box<dyn FnOnce(&mut A, &mut Context<A>) + Send>;

/// A single entry of an actor's mailbox.
pub enum MailboxItem<A: Actor> {
    Message(A::Message),
    Resume {
        handle: ContinuationHandle,
        resume: Resumption<A>,
    },
}

impl<A: Actor> fmt::Debug for MailboxItem<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailboxItem::Message(msg) => f.debug_tuple("Message").field(msg).finish(),
            MailboxItem::Resume { handle, .. } => {
                f.debug_struct("Resume").field("handle", handle).finish()
            }
        }
    }
}
