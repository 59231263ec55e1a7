//! # Serialized Services
//!
//! Some resources cannot be used concurrently: a native engine that is not
//! thread-safe, a device handle, a single connection. This module wraps such a
//! resource in a [`Service`] owned by exactly one dedicated worker thread.
//!
//! Actors never call the service directly. They call [`ServiceClient::suspend`],
//! which:
//!
//! 1. captures the actor's follow-up logic as a continuation bound to that actor,
//! 2. enqueues the request on the worker's FIFO queue,
//! 3. returns immediately.
//!
//! The worker processes one request at a time and resumes the continuation with
//! the response, which lands back in the requestor's own mailbox.
//!
//! ```text
//!  actor A ──suspend──┐                    ┌──resume──► mailbox A
//!  actor B ──suspend──┼──► [worker queue] ─┼──resume──► mailbox B
//!  actor C ──suspend──┘    (one thread)    └──resume──► mailbox C
//! ```
//!
//! The queue is shared, so two requests issued back-to-back by one actor carry no
//! ordering promise relative to requests from other actors interleaved between them.

use crate::actor::{Actor, Context};
use crate::client::ActorRef;
use crate::continuation::{ContinuationHandle, ContinuationRegistry};
use crate::error::FrameworkError;
use std::fmt::Debug;
use std::sync::Arc;
use std::thread;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// A resource that must process one request at a time.
pub trait Service: Send + 'static {
    type Request: Send + Debug + 'static;
    type Response: Send + 'static;

    /// Process one request. Called only from the service's worker thread.
    fn call(&mut self, request: Self::Request) -> Self::Response;
}

struct Job<Req> {
    request: Req,
    reply_to: ContinuationHandle,
}

/// The cloneable, caller-side handle of a serialized service.
pub struct ServiceClient<S: Service> {
    name: Arc<str>,
    sender: mpsc::UnboundedSender<Job<S::Request>>,
    registry: Arc<ContinuationRegistry<S::Response>>,
}

impl<S: Service> Clone for ServiceClient<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            sender: self.sender.clone(),
            registry: self.registry.clone(),
        }
    }
}

impl<S: Service> ServiceClient<S> {
    /// Issue `request` on behalf of `requestor` without waiting for it.
    ///
    /// `resume` runs later inside `requestor`'s turn loop with the service's
    /// response. If the worker has shut down, nothing is captured and
    /// [`FrameworkError::ServiceClosed`] is returned.
    pub fn suspend<A, F>(
        &self,
        requestor: &ActorRef<A>,
        request: S::Request,
        resume: F,
    ) -> Result<ContinuationHandle, FrameworkError>
    where
        A: Actor,
        F: FnOnce(&mut A, &mut Context<A>, S::Response) + Send + 'static,
    {
        let reply_to = self.registry.suspend(requestor, resume);
        debug!(service = %self.name, handle = %reply_to, requestor = %requestor.id(), ?request, "Request");
        if self.sender.send(Job { request, reply_to }).is_err() {
            self.registry.forget(reply_to);
            error!(service = %self.name, "Service closed");
            return Err(FrameworkError::ServiceClosed(self.name.to_string()));
        }
        Ok(reply_to)
    }

    /// The registry holding this service's outstanding continuations.
    pub fn registry(&self) -> &Arc<ContinuationRegistry<S::Response>> {
        &self.registry
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Owner of the dedicated worker thread.
pub struct ServiceWorker {
    name: String,
    thread: thread::JoinHandle<()>,
}

impl ServiceWorker {
    /// Move `service` onto a new, exclusively owned thread.
    ///
    /// The worker runs until every [`ServiceClient`] has been dropped.
    pub fn spawn<S: Service>(
        name: impl Into<String>,
        mut service: S,
    ) -> Result<(ServiceClient<S>, ServiceWorker), FrameworkError> {
        let name = name.into();
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job<S::Request>>();
        let registry = Arc::new(ContinuationRegistry::new(name.clone()));
        let worker_registry = registry.clone();
        let thread_name = name.clone();

        let thread = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                info!(service = %thread_name, "Service worker started");
                let mut served: u64 = 0;
                while let Some(Job { request, reply_to }) = receiver.blocking_recv() {
                    let response = service.call(request);
                    served += 1;
                    // Faults are already logged by the registry; the worker keeps going.
                    let _ = worker_registry.resume(reply_to, response);
                }
                info!(service = %thread_name, served, "Service worker shutdown");
            })
            .map_err(|e| FrameworkError::WorkerFailed(e.to_string()))?;

        let client = ServiceClient {
            name: Arc::from(name.as_str()),
            sender,
            registry,
        };
        Ok((client, ServiceWorker { name, thread }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wait for the worker thread to exit.
    ///
    /// Blocks the calling thread; from async code use
    /// [`ServiceWorker::shutdown_async`].
    pub fn join(self) -> Result<(), FrameworkError> {
        self.thread
            .join()
            .map_err(|_| FrameworkError::WorkerFailed(format!("{} panicked", self.name)))
    }

    /// Async wrapper around [`ServiceWorker::join`].
    pub async fn shutdown_async(self) -> Result<(), FrameworkError> {
        tokio::task::spawn_blocking(move || self.join())
            .await
            .map_err(|e| FrameworkError::WorkerFailed(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailbox::spawn;
    use async_trait::async_trait;
    use std::thread::ThreadId;

    /// Doubles numbers and reports the thread it ran on.
    struct Doubler;

    impl Service for Doubler {
        type Request = u64;
        type Response = (u64, ThreadId);

        fn call(&mut self, n: u64) -> (u64, ThreadId) {
            (n * 2, thread::current().id())
        }
    }

    struct Caller {
        out: mpsc::UnboundedSender<(u64, ThreadId, ThreadId)>,
    }

    #[async_trait]
    impl Actor for Caller {
        type Message = ();

        async fn handle(&mut self, _msg: (), _ctx: &mut Context<Self>) {}
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_resume_never_runs_on_worker_thread() {
        let (client, worker) = ServiceWorker::spawn("doubler", Doubler).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (caller, join) = spawn("caller", Caller { out: tx });

        client
            .suspend(&caller, 21, |c: &mut Caller, _, (n, worker_thread)| {
                let _ = c.out.send((n, worker_thread, thread::current().id()));
            })
            .unwrap();

        let (n, worker_thread, resumed_on) = rx.recv().await.unwrap();
        assert_eq!(n, 42);
        assert_ne!(worker_thread, resumed_on);

        drop(client);
        worker.shutdown_async().await.unwrap();
        drop(caller);
        join.await.unwrap();
    }

    #[tokio::test]
    async fn test_suspend_after_shutdown_reports_service_closed() {
        let (client, worker) = ServiceWorker::spawn("doubler", Doubler).unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let (caller, _join) = spawn("caller", Caller { out: tx });

        // Let the worker exit, then point a client at a closed queue.
        let ServiceClient {
            name,
            sender,
            registry,
        } = client;
        drop(sender);
        worker.shutdown_async().await.unwrap();
        let (closed_tx, _) = mpsc::unbounded_channel::<Job<u64>>();
        let orphan = ServiceClient::<Doubler> {
            name,
            sender: closed_tx,
            registry,
        };

        let result = orphan.suspend(&caller, 1, |_: &mut Caller, _, _| {});
        assert_eq!(
            result,
            Err(FrameworkError::ServiceClosed("doubler".to_string()))
        );
        assert_eq!(orphan.registry().pending(), 0);
        // The job never reached a worker, so no late result is awaited.
        assert_eq!(orphan.registry().reclaimed(), 0);
    }
}
