//! # Packet Intake
//!
//! Every inbound datagram walks one linear pipeline:
//!
//! ```text
//! RawBytes ─decode─► SignedMessage ─verify─► Authenticated ─destructure─► RoutingTuple ─route─► mailbox
//!     │                   │                        │                           │
//!     └───────────────────┴────────── drop ────────┴───────────────────────────┘
//! ```
//!
//! Failure at any stage is terminal for that packet only. Rejections are counted
//! in [`IntakeStats`] and logged at `trace`; nothing is ever sent back, so the
//! node cannot be used as a verification oracle.
//!
//! `on_receive` only enqueues. Verification is a suspension on the crypto worker,
//! so a slow verify never stalls the socket loop, and packets still waiting on
//! the worker do not block the intake actor from decoding the next ones.

pub mod error;
pub mod stages;
pub mod stats;

pub use error::*;
pub use stages::Routed;
pub use stats::*;

use crate::clients::CryptoClient;
use crate::crypto::{CryptoEngine, CryptoRequest, CryptoResponse, VerificationFailure};
use crate::model::Authenticated;
use crate::routing::{DeadLetter, RouteResolver, UnresolvedPolicy};
use crate::transport::PacketSink;
use actor_framework::{spawn, Actor, ActorRef, Context, Recipient, Service};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace};

#[derive(Debug)]
pub enum IntakeMsg {
    Inbound(Vec<u8>),
}

/// Routing behaviour of an intake actor.
#[derive(Debug, Clone)]
pub struct IntakeSettings {
    pub max_datagram: usize,
    pub unresolved_policy: UnresolvedPolicy,
    pub dead_letters: Option<Recipient<DeadLetter>>,
}

pub struct IntakeActor<S = CryptoEngine>
where
    S: Service<Request = CryptoRequest, Response = CryptoResponse>,
{
    crypto: CryptoClient<S>,
    routes: Arc<dyn RouteResolver>,
    settings: IntakeSettings,
    stats: Arc<IntakeStats>,
}

impl<S> IntakeActor<S>
where
    S: Service<Request = CryptoRequest, Response = CryptoResponse>,
{
    pub fn new(crypto: CryptoClient<S>, routes: Arc<dyn RouteResolver>, settings: IntakeSettings) -> Self {
        Self {
            crypto,
            routes,
            settings,
            stats: Arc::new(IntakeStats::default()),
        }
    }

    /// Spawn onto the runtime and return the socket-facing handle.
    pub fn start(self, id: impl Into<actor_framework::ActorId>) -> (IntakeHandle<S>, JoinHandle<()>) {
        let stats = self.stats.clone();
        let (actor, join) = spawn(id, self);
        (IntakeHandle { actor, stats }, join)
    }

    /// Resumed after verification: finish the pipeline and settle.
    fn complete(&mut self, verified: Result<Authenticated, VerificationFailure>) {
        let outcome = verified
            .map_err(IntakeRejection::from)
            .and_then(|authentic| stages::destructure(&authentic, self.settings.max_datagram))
            .and_then(|tuple| {
                stages::route(
                    tuple,
                    self.routes.as_ref(),
                    self.settings.unresolved_policy,
                    self.settings.dead_letters.as_ref(),
                )
            });
        self.settle(outcome);
    }

    /// The single place where a packet's fate is recorded.
    fn settle(&self, outcome: Result<Routed, IntakeRejection>) {
        match outcome {
            Ok(Routed::Delivered(destination)) => {
                self.stats.record_delivered();
                trace!(%destination, "Delivered");
            }
            Ok(Routed::DeadLettered(destination)) => {
                self.stats.record_dead_lettered();
                trace!(%destination, "Dead-lettered");
            }
            Err(rejection) => {
                self.stats.record_rejection(&rejection);
                trace!(reason = rejection.reason(), "Packet dropped");
            }
        }
    }
}

#[async_trait]
impl<S> Actor for IntakeActor<S>
where
    S: Service<Request = CryptoRequest, Response = CryptoResponse>,
{
    type Message = IntakeMsg;

    async fn handle(&mut self, msg: IntakeMsg, ctx: &mut Context<Self>) {
        let IntakeMsg::Inbound(bytes) = msg;
        self.stats.record_received();

        let candidate = match stages::decode(&bytes, self.settings.max_datagram) {
            Ok(candidate) => candidate,
            Err(rejection) => return self.settle(Err(rejection)),
        };
        let Some(myself) = ctx.myself() else {
            debug!("Intake shutting down; packet not verified");
            return self.stats.record_abandoned();
        };
        let suspended = self.crypto.verify(&myself, candidate, |me: &mut Self, _ctx, verified| {
            me.complete(verified)
        });
        if let Err(e) = suspended {
            // Not a property of the packet: the crypto worker is gone.
            error!(error = %e, "Cannot verify inbound packet");
            self.stats.record_abandoned();
        }
    }
}

/// Cheap, cloneable entry point into an intake actor.
pub struct IntakeHandle<S = CryptoEngine>
where
    S: Service<Request = CryptoRequest, Response = CryptoResponse>,
{
    actor: ActorRef<IntakeActor<S>>,
    stats: Arc<IntakeStats>,
}

impl<S> Clone for IntakeHandle<S>
where
    S: Service<Request = CryptoRequest, Response = CryptoResponse>,
{
    fn clone(&self) -> Self {
        Self {
            actor: self.actor.clone(),
            stats: self.stats.clone(),
        }
    }
}

impl<S> IntakeHandle<S>
where
    S: Service<Request = CryptoRequest, Response = CryptoResponse>,
{
    pub fn stats(&self) -> IntakeSnapshot {
        self.stats.snapshot()
    }

    pub fn actor(&self) -> &ActorRef<IntakeActor<S>> {
        &self.actor
    }
}

impl<S> PacketSink for IntakeHandle<S>
where
    S: Service<Request = CryptoRequest, Response = CryptoResponse>,
{
    fn on_receive(&self, bytes: Vec<u8>) {
        if let Err(e) = self.actor.tell(IntakeMsg::Inbound(bytes)) {
            error!(error = %e, "Intake actor closed; datagram lost");
        }
    }
}
