//! # Secure Send Pipeline
//!
//! ```text
//!  send(dest, msg) ─► encode (dest, msg) ─► suspend on Sign ─► return
//!                                                 │
//!            (later, in the requestor's turn)     ▼
//!          resolve physical ─► Envelope ─► wire bytes ─► transmit
//! ```
//!
//! Delivery is best effort: no acknowledgment, no retry. Two sends issued back
//! to back may reach the wire in either order because both queue independently
//! at the shared crypto worker.

use crate::clients::CryptoClient;
use crate::codec;
use crate::crypto::{CryptoEngine, CryptoRequest, CryptoResponse};
use crate::error::RelayError;
use crate::model::{Envelope, LogicalAddress, Message, NodeIdentity, RoutingTuple, SignedMessage};
use crate::routing::AddressResolver;
use crate::transport::Transmitter;
use actor_framework::{Actor, ActorRef, Context, ContinuationHandle, Service};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Counters kept by a [`SecureSender`] and its clones.
#[derive(Debug, Default)]
pub struct SendStats {
    pub transmitted: AtomicU64,
    pub unresolved: AtomicU64,
    pub failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendSnapshot {
    pub transmitted: u64,
    pub unresolved: u64,
    pub failed: u64,
}

impl SendStats {
    pub fn snapshot(&self) -> SendSnapshot {
        SendSnapshot {
            transmitted: self.transmitted.load(Ordering::Relaxed),
            unresolved: self.unresolved.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Signs and transmits messages on behalf of any actor.
pub struct SecureSender<S = CryptoEngine>
where
    S: Service<Request = CryptoRequest, Response = CryptoResponse>,
{
    crypto: CryptoClient<S>,
    identity: Arc<NodeIdentity>,
    addresses: Arc<dyn AddressResolver>,
    transmitter: Arc<dyn Transmitter>,
    max_datagram: usize,
    stats: Arc<SendStats>,
}

impl<S> Clone for SecureSender<S>
where
    S: Service<Request = CryptoRequest, Response = CryptoResponse>,
{
    fn clone(&self) -> Self {
        Self {
            crypto: self.crypto.clone(),
            identity: self.identity.clone(),
            addresses: self.addresses.clone(),
            transmitter: self.transmitter.clone(),
            max_datagram: self.max_datagram,
            stats: self.stats.clone(),
        }
    }
}

impl<S> SecureSender<S>
where
    S: Service<Request = CryptoRequest, Response = CryptoResponse>,
{
    pub fn new(
        crypto: CryptoClient<S>,
        identity: Arc<NodeIdentity>,
        addresses: Arc<dyn AddressResolver>,
        transmitter: Arc<dyn Transmitter>,
        max_datagram: usize,
    ) -> Self {
        Self {
            crypto,
            identity,
            addresses,
            transmitter,
            max_datagram,
            stats: Arc::new(SendStats::default()),
        }
    }

    pub fn identity(&self) -> &Arc<NodeIdentity> {
        &self.identity
    }

    pub fn stats(&self) -> SendSnapshot {
        self.stats.snapshot()
    }

    /// Fire-and-forget send of `message` to `destination`.
    ///
    /// Returns as soon as the signing request is queued.
    pub fn send<A: Actor>(
        &self,
        requestor: &ActorRef<A>,
        destination: impl Into<LogicalAddress>,
        message: Message,
    ) -> Result<ContinuationHandle, RelayError> {
        self.send_then(requestor, destination, message, |_: &mut A, _, _| {})
    }

    /// Like [`SecureSender::send`], then runs `on_sent` in the requestor's turn
    /// once the signed message has been handed to the transmitter.
    pub fn send_then<A, F>(
        &self,
        requestor: &ActorRef<A>,
        destination: impl Into<LogicalAddress>,
        message: Message,
        on_sent: F,
    ) -> Result<ContinuationHandle, RelayError>
    where
        A: Actor,
        F: FnOnce(&mut A, &mut Context<A>, &SignedMessage) + Send + 'static,
    {
        let destination = destination.into();
        let tuple = RoutingTuple::new(destination.clone(), message);
        let payload = codec::encode(&tuple, self.max_datagram)?;
        debug!(%destination, requestor = %requestor.id(), len = payload.len(), "Send");

        let addresses = self.addresses.clone();
        let transmitter = self.transmitter.clone();
        let stats = self.stats.clone();
        let max_datagram = self.max_datagram;

        let handle = self.crypto.sign(
            requestor,
            self.identity.clone(),
            payload,
            move |actor: &mut A, ctx: &mut Context<A>, signed: SignedMessage| {
                let Some(address) = addresses.resolve_address(&destination) else {
                    stats.unresolved.fetch_add(1, Ordering::Relaxed);
                    warn!(%destination, "No address for destination; message dropped");
                    return;
                };
                let Some(physical) = addresses.to_physical(&address) else {
                    stats.unresolved.fetch_add(1, Ordering::Relaxed);
                    warn!(%destination, %address, "No physical endpoint; message dropped");
                    return;
                };
                let envelope = Envelope::new(address, signed);
                let bytes = match envelope.signed().to_wire(max_datagram) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        stats.failed.fetch_add(1, Ordering::Relaxed);
                        error!(%destination, error = %e, "Signed message does not fit a datagram");
                        return;
                    }
                };
                if let Err(e) = transmitter.transmit(physical, bytes) {
                    stats.failed.fetch_add(1, Ordering::Relaxed);
                    warn!(%destination, %physical, error = %e, "Transmit failed");
                    return;
                }
                stats.transmitted.fetch_add(1, Ordering::Relaxed);
                on_sent(actor, ctx, envelope.signed());
            },
        )?;
        Ok(handle)
    }
}
