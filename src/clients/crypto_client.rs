use crate::crypto::{CryptoEngine, CryptoRequest, CryptoResponse, VerificationFailure};
use crate::model::{Authenticated, NodeIdentity, SignedMessage};
use actor_framework::{
    Actor, ActorRef, Context, ContinuationHandle, FrameworkError, Service, ServiceClient,
    ServiceWorker,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Client for the serialized crypto service.
///
/// Both operations suspend the calling actor's follow-up logic and return at once.
/// `then` runs later in the caller's own turn loop. An engine fault, or a response
/// of the wrong kind, is logged at `error`, counted, and `then` is not called.
pub struct CryptoClient<S = CryptoEngine>
where
    S: Service<Request = CryptoRequest, Response = CryptoResponse>,
{
    inner: ServiceClient<S>,
    faults: Arc<AtomicU64>,
}

impl<S> Clone for CryptoClient<S>
where
    S: Service<Request = CryptoRequest, Response = CryptoResponse>,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            faults: self.faults.clone(),
        }
    }
}

impl<S> CryptoClient<S>
where
    S: Service<Request = CryptoRequest, Response = CryptoResponse>,
{
    pub fn new(inner: ServiceClient<S>) -> Self {
        Self {
            inner,
            faults: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Move `engine` onto its own worker thread and return a client for it.
    pub fn spawn(
        name: impl Into<String>,
        engine: S,
    ) -> Result<(Self, ServiceWorker), FrameworkError> {
        let (inner, worker) = ServiceWorker::spawn(name, engine)?;
        Ok((Self::new(inner), worker))
    }

    pub fn service(&self) -> &ServiceClient<S> {
        &self.inner
    }

    /// Faults reported back to callers of this client (and its clones).
    pub fn faults(&self) -> u64 {
        self.faults.load(Ordering::Relaxed)
    }

    /// Sign `payload` as `identity`.
    #[instrument(skip_all, fields(requestor = %requestor.id(), len = payload.len()))]
    pub fn sign<A, F>(
        &self,
        requestor: &ActorRef<A>,
        identity: Arc<NodeIdentity>,
        payload: Vec<u8>,
        then: F,
    ) -> Result<ContinuationHandle, FrameworkError>
    where
        A: Actor,
        F: FnOnce(&mut A, &mut Context<A>, SignedMessage) + Send + 'static,
    {
        let faults = self.faults.clone();
        let service = self.inner.name().to_string();
        debug!("Suspending on sign");
        self.inner.suspend(
            requestor,
            CryptoRequest::Sign { identity, payload },
            move |actor: &mut A, ctx: &mut Context<A>, response: CryptoResponse| match response {
                CryptoResponse::Signed(Ok(signed)) => then(actor, ctx, signed),
                CryptoResponse::Signed(Err(fault)) => {
                    faults.fetch_add(1, Ordering::Relaxed);
                    error!(%service, actor_id = %ctx.id(), error = %fault, "Sign failed");
                }
                other => {
                    faults.fetch_add(1, Ordering::Relaxed);
                    error!(%service, actor_id = %ctx.id(), expected = "signed", got = other.kind(), "Unexpected crypto response");
                }
            },
        )
    }

    /// Check `candidate`. A [`VerificationFailure`] is a routine outcome and is
    /// handed to `then` like a success.
    pub fn verify<A, F>(
        &self,
        requestor: &ActorRef<A>,
        candidate: SignedMessage,
        then: F,
    ) -> Result<ContinuationHandle, FrameworkError>
    where
        A: Actor,
        F: FnOnce(&mut A, &mut Context<A>, Result<Authenticated, VerificationFailure>)
            + Send
            + 'static,
    {
        let faults = self.faults.clone();
        let service = self.inner.name().to_string();
        self.inner.suspend(
            requestor,
            CryptoRequest::Verify { candidate },
            move |actor: &mut A, ctx: &mut Context<A>, response: CryptoResponse| match response {
                CryptoResponse::Verified(outcome) => then(actor, ctx, outcome),
                other => {
                    faults.fetch_add(1, Ordering::Relaxed);
                    error!(%service, actor_id = %ctx.id(), expected = "verified", got = other.kind(), "Unexpected crypto response");
                }
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{CryptoEngineFault, Ed25519Scheme};
    use crate::model::SignerId;
    use actor_framework::mock::MockService;
    use actor_framework::spawn;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[derive(Debug)]
    enum Outcome {
        Signed(SignedMessage),
        Verified(Result<Authenticated, VerificationFailure>),
    }

    struct Recorder {
        out: mpsc::UnboundedSender<Outcome>,
    }

    #[async_trait]
    impl Actor for Recorder {
        type Message = ();

        async fn handle(&mut self, _: (), _: &mut Context<Self>) {}
    }

    fn recorder() -> (ActorRef<Recorder>, mpsc::UnboundedReceiver<Outcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (actor, _join) = spawn("recorder", Recorder { out: tx });
        (actor, rx)
    }

    #[tokio::test]
    async fn test_sign_then_verify_through_worker() {
        let (client, worker) =
            CryptoClient::spawn("crypto-test", CryptoEngine::new(Ed25519Scheme)).unwrap();
        let (actor, mut rx) = recorder();
        let identity = Arc::new(NodeIdentity::from_secret_bytes(&[4u8; 32]));

        client
            .sign(&actor, identity.clone(), b"abc".to_vec(), |p: &mut Recorder, _, s| {
                let _ = p.out.send(Outcome::Signed(s));
            })
            .unwrap();
        let Some(Outcome::Signed(signed)) = rx.recv().await else {
            panic!("expected signed outcome");
        };
        assert_eq!(signed.signer(), &identity.signer_id());

        client
            .verify(&actor, signed, |p: &mut Recorder, _, r| {
                let _ = p.out.send(Outcome::Verified(r));
            })
            .unwrap();
        let Some(Outcome::Verified(Ok(authentic))) = rx.recv().await else {
            panic!("expected verified outcome");
        };
        assert_eq!(authentic.payload(), b"abc");
        assert_eq!(client.faults(), 0);

        drop(client);
        worker.shutdown_async().await.unwrap();
    }

    #[tokio::test]
    async fn test_fault_and_wrong_kind_never_reach_continuation() {
        let mock = MockService::<CryptoRequest, CryptoResponse>::new("crypto-mock");
        mock.expect()
            .respond_with(CryptoResponse::Signed(Err(CryptoEngineFault("boom".into()))));
        mock.expect()
            .respond_with(CryptoResponse::Signed(Err(CryptoEngineFault("late".into()))));
        let (service, worker, expectations) = mock.spawn().unwrap();
        let client = CryptoClient::new(service);
        let (actor, mut rx) = recorder();

        client
            .sign(&actor, Arc::new(NodeIdentity::generate()), vec![1], |p: &mut Recorder, _, s| {
                let _ = p.out.send(Outcome::Signed(s));
            })
            .unwrap();
        // Verify answered with a sign response.
        let candidate = SignedMessage::from_parts(vec![], vec![], SignerId::from_bytes([0; 32]));
        client
            .verify(&actor, candidate, |p: &mut Recorder, _, r| {
                let _ = p.out.send(Outcome::Verified(r));
            })
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(client.faults(), 2);
        assert_eq!(client.service().registry().pending(), 0);

        drop(client);
        worker.shutdown_async().await.unwrap();
        expectations.verify();
        assert_eq!(expectations.received().len(), 2);
    }
}
