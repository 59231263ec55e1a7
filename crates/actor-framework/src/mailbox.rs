//! # Mailbox & Event Loop
//!
//! A [`Mailbox`] is the strictly ordered, single-consumer queue of one actor. It is
//! the "server" half of an actor: it owns the receiving end of the channel and runs
//! the loop that feeds items, one at a time, into the actor's state.
//!
//! **Concurrency Model**:
//! Any number of mailboxes run in parallel on the Tokio worker pool, but each one
//! processes its own items *sequentially*. Resumptions of suspended continuations
//! are interleaved with ordinary messages in enqueue order and never run
//! concurrently with them.

use crate::actor::{Actor, ActorId, Context};
use crate::client::ActorRef;
use crate::message::MailboxItem;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

/// The receiving side of an actor's mailbox.
pub struct Mailbox<A: Actor> {
    id: ActorId,
    receiver: mpsc::UnboundedReceiver<MailboxItem<A>>,
    myself: mpsc::WeakUnboundedSender<MailboxItem<A>>,
}

impl<A: Actor> Mailbox<A> {
    /// Creates a mailbox and the first reference to it.
    ///
    /// The mailbox must be driven with [`Mailbox::run`]; items sent before that are
    /// buffered in order.
    pub fn new(id: impl Into<ActorId>) -> (Self, ActorRef<A>) {
        let id = id.into();
        let (sender, receiver) = mpsc::unbounded_channel();
        let mailbox = Self {
            id: id.clone(),
            receiver,
            myself: sender.downgrade(),
        };
        (mailbox, ActorRef::new(id, sender))
    }

    pub fn id(&self) -> &ActorId {
        &self.id
    }

    /// Runs the actor's event loop until every [`ActorRef`] is dropped or the actor
    /// calls [`Context::stop`].
    pub async fn run(mut self, mut actor: A) {
        // Extract just the type name (e.g., "IntakeActor" instead of "secure_relay::intake::IntakeActor")
        let actor_type = std::any::type_name::<A>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        let mut ctx = Context::new(self.id.clone(), self.myself.clone());
        info!(actor_type, actor_id = %self.id, "Actor started");
        actor.started(&mut ctx).await;

        let mut processed: u64 = 0;
        while !ctx.is_stopping() {
            let Some(item) = self.receiver.recv().await else {
                break;
            };
            processed += 1;
            match item {
                MailboxItem::Message(msg) => {
                    trace!(actor_type, actor_id = %self.id, ?msg, "Message");
                    actor.handle(msg, &mut ctx).await;
                }
                MailboxItem::Resume { handle, resume } => {
                    trace!(actor_type, actor_id = %self.id, %handle, "Resume");
                    resume(&mut actor, &mut ctx);
                }
            }
        }

        if ctx.is_stopping() {
            debug!(actor_type, actor_id = %self.id, "Stop requested");
            self.receiver.close();
        }
        actor.stopped().await;
        info!(actor_type, actor_id = %self.id, processed, "Shutdown");
    }
}

/// Create a mailbox for `actor` and run it on its own Tokio task.
pub fn spawn<A: Actor>(id: impl Into<ActorId>, actor: A) -> (ActorRef<A>, JoinHandle<()>) {
    let (mailbox, actor_ref) = Mailbox::new(id);
    let handle = tokio::spawn(mailbox.run(actor));
    (actor_ref, handle)
}
