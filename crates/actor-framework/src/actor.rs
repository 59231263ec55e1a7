//! # Actor Trait
//!
//! The `Actor` trait is the contract every unit of concurrent execution implements.
//! An actor owns its state exclusively and reacts to the items of its own mailbox,
//! one at a time. Two kinds of items reach an actor:
//!
//! - **Messages** of the actor's associated `Message` type, delivered to [`Actor::handle`].
//! - **Resumptions**: logic captured at a suspension point (see [`crate::continuation`])
//!   that the framework runs against the actor's state when a deferred result arrives.
//!
//! Both run inside the same sequential loop, so a resumption never races with a
//! message handler of the same actor.
//!
//! # Turns never wait on services
//! A turn may `.await`, but awaiting a serialized service inside `handle` would stall
//! every other item queued behind it. Requests to a service go through
//! [`ServiceClient::suspend`](crate::ServiceClient::suspend) instead, which returns
//! immediately and schedules the continuation back into this mailbox.

use crate::client::ActorRef;
use crate::message::MailboxItem;
use async_trait::async_trait;
use std::fmt::{self, Debug, Display};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Opaque, cheaply cloneable identifier of an actor.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(Arc<str>);

impl ActorId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({})", self.0)
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ActorId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

/// An independently scheduled unit with its own ordered mailbox.
///
/// # Example
///
/// ```rust
/// use actor_framework::{spawn, Actor, Context};
/// use async_trait::async_trait;
///
/// struct Counter { total: u64 }
///
/// #[async_trait]
/// impl Actor for Counter {
///     type Message = u64;
///
///     async fn handle(&mut self, n: u64, _ctx: &mut Context<Self>) {
///         self.total += n;
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (counter, handle) = spawn("counter", Counter { total: 0 });
///     counter.tell(2).unwrap();
///     drop(counter);
///     handle.await.unwrap();
/// }
/// ```
#[async_trait]
pub trait Actor: Send + Sized + 'static {
    /// The application messages this actor accepts.
    type Message: Send + Debug + 'static;

    /// Called once before the first mailbox item is processed.
    async fn started(&mut self, _ctx: &mut Context<Self>) {}

    /// Handle one application message.
    async fn handle(&mut self, msg: Self::Message, ctx: &mut Context<Self>);

    /// Called once after the loop exits.
    async fn stopped(&mut self) {}
}

/// The execution context handed to every turn of an actor.
pub struct Context<A: Actor> {
    id: ActorId,
    myself: mpsc::WeakUnboundedSender<MailboxItem<A>>,
    stopping: bool,
}

impl<A: Actor> Context<A> {
    pub(crate) fn new(id: ActorId, myself: mpsc::WeakUnboundedSender<MailboxItem<A>>) -> Self {
        Self {
            id,
            myself,
            stopping: false,
        }
    }

    pub fn id(&self) -> &ActorId {
        &self.id
    }

    /// A reference to the running actor.
    ///
    /// Returns `None` once every external reference has been dropped and the
    /// mailbox is draining its final items.
    pub fn myself(&self) -> Option<ActorRef<A>> {
        self.myself
            .upgrade()
            .map(|sender| ActorRef::new(self.id.clone(), sender))
    }

    /// Ask the loop to exit after the current item.
    pub fn stop(&mut self) {
        self.stopping = true;
    }

    pub(crate) fn is_stopping(&self) -> bool {
        self.stopping
    }
}
