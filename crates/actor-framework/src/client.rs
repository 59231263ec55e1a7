//! # Actor References
//!
//! This module defines the handles used to reach a running actor: the typed
//! [`ActorRef`] and the type-erased [`Recipient`].

use crate::actor::{Actor, ActorId};
use crate::continuation::ContinuationHandle;
use crate::error::FrameworkError;
use crate::message::{MailboxItem, Resumption};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// A cloneable, typed handle to an actor's mailbox.
///
/// Sending never blocks: the mailbox is unbounded so that a service resuming a
/// continuation can never be stalled by a busy actor.
pub struct ActorRef<A: Actor> {
    id: ActorId,
    sender: mpsc::UnboundedSender<MailboxItem<A>>,
}

impl<A: Actor> Clone for ActorRef<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            sender: self.sender.clone(),
        }
    }
}

impl<A: Actor> fmt::Debug for ActorRef<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorRef").field("id", &self.id).finish()
    }
}

impl<A: Actor> ActorRef<A> {
    pub(crate) fn new(id: ActorId, sender: mpsc::UnboundedSender<MailboxItem<A>>) -> Self {
        Self { id, sender }
    }

    pub fn id(&self) -> &ActorId {
        &self.id
    }

    /// Enqueue a message. Fails only if the actor has terminated.
    pub fn tell(&self, msg: A::Message) -> Result<(), FrameworkError> {
        self.sender
            .send(MailboxItem::Message(msg))
            .map_err(|_| FrameworkError::ActorClosed(self.id.clone()))
    }

    /// Enqueue the resumption of a continuation.
    pub(crate) fn resume_with(
        &self,
        handle: ContinuationHandle,
        resume: Resumption<A>,
    ) -> Result<(), FrameworkError> {
        self.sender
            .send(MailboxItem::Resume { handle, resume })
            .map_err(|_| FrameworkError::ActorClosed(self.id.clone()))
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Erase the actor type, keeping only the ability to deliver `M`.
    pub fn recipient<M>(&self) -> Recipient<M>
    where
        M: Send + 'static,
        A::Message: From<M>,
    {
        let actor = self.clone();
        Recipient {
            id: self.id.clone(),
            deliver: Arc::new(move |msg: M| actor.tell(A::Message::from(msg))),
        }
    }
}

/// A type-erased delivery target for messages of type `M`.
pub struct Recipient<M> {
    id: ActorId,
    deliver: Arc<dyn Fn(M) -> Result<(), FrameworkError> + Send + Sync>,
}

impl<M> Clone for Recipient<M> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            deliver: Arc::clone(&self.deliver),
        }
    }
}

impl<M> fmt::Debug for Recipient<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recipient").field("id", &self.id).finish()
    }
}

impl<M> Recipient<M> {
    /// Build a recipient from a bare delivery function.
    pub fn from_fn(
        id: impl Into<ActorId>,
        deliver: impl Fn(M) -> Result<(), FrameworkError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            deliver: Arc::new(deliver),
        }
    }

    pub fn id(&self) -> &ActorId {
        &self.id
    }

    pub fn tell(&self, msg: M) -> Result<(), FrameworkError> {
        (self.deliver)(msg)
    }
}
