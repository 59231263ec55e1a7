//! # Mock Services & Testing Guide
//!
//! The [`MockService`] type implements [`Service`] with a scripted queue of
//! responses instead of a real engine. Spawned with [`ServiceWorker::spawn`]
//! it behaves exactly like a production service (same thread, same
//! continuation registry), which makes it the easy way to exercise the paths that
//! are hard to reach with the real thing: engine faults, malformed responses,
//! slow responses.
//!
//! ## When to use Mocks vs Real Services
//!
//! | Feature | MockService | Real Service |
//! |---------|-------------|--------------|
//! | **Determinism** | Scripted responses | Whatever the engine computes |
//! | **Fault Injection** | Easy (`respond_with`) | Hard (requires a broken engine) |
//! | **Use Case** | Testing the logic *around* a suspension | Testing the engine itself or the full node |
//!
//! ## Example
//!
//! ```rust
//! use actor_framework::mock::MockService;
//! use actor_framework::{spawn, Actor, Context, ServiceWorker};
//! use async_trait::async_trait;
//! use tokio::sync::mpsc;
//!
//! struct Caller { out: mpsc::UnboundedSender<String> }
//!
//! #[async_trait]
//! impl Actor for Caller {
//!     type Message = ();
//!     async fn handle(&mut self, _: (), _: &mut Context<Self>) {}
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockService::<u32, String>::new("mock");
//!     mock.expect().respond_with("fault".to_string());
//!     let expectations = mock.expectations();
//!
//!     let (client, worker) = ServiceWorker::spawn("mock", mock).unwrap();
//!     let (tx, mut rx) = mpsc::unbounded_channel();
//!     let (caller, _join) = spawn("caller", Caller { out: tx });
//!
//!     client.suspend(&caller, 7, |c: &mut Caller, _, r| { let _ = c.out.send(r); }).unwrap();
//!     assert_eq!(rx.recv().await.unwrap(), "fault");
//!
//!     drop(client);
//!     worker.shutdown_async().await.unwrap();
//!     expectations.verify();
//! }
//! ```

use crate::service::{Service, ServiceWorker};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// Represents one expected request and the scripted response.
struct Expectation<Resp> {
    response: Resp,
    delay: Option<Duration>,
}

/// Shared view of a mock's outstanding expectations and received requests.
pub struct MockExpectations<Req, Resp> {
    name: String,
    queue: Arc<Mutex<VecDeque<Expectation<Resp>>>>,
    received: Arc<Mutex<Vec<Req>>>,
}

impl<Req: Clone, Resp> MockExpectations<Req, Resp> {
    /// Requests the mock has processed so far, in arrival order.
    pub fn received(&self) -> Vec<Req> {
        self.received.lock().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.queue.lock().len();
        if remaining != 0 {
            panic!(
                "{}: not all expectations were met. {} remaining",
                self.name, remaining
            );
        }
    }
}

/// A service that answers from a scripted queue.
pub struct MockService<Req, Resp> {
    name: String,
    queue: Arc<Mutex<VecDeque<Expectation<Resp>>>>,
    received: Arc<Mutex<Vec<Req>>>,
}

impl<Req, Resp> MockService<Req, Resp>
where
    Req: Clone + Send + Debug + 'static,
    Resp: Send + 'static,
{
    /// Creates a new mock service with no expectations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            queue: Arc::new(Mutex::new(VecDeque::new())),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Expects one more request.
    pub fn expect(&self) -> ExpectationBuilder<Resp> {
        ExpectationBuilder {
            queue: self.queue.clone(),
            delay: None,
        }
    }

    /// Handle for inspecting the mock after it has moved onto its worker.
    pub fn expectations(&self) -> MockExpectations<Req, Resp> {
        MockExpectations {
            name: self.name.clone(),
            queue: self.queue.clone(),
            received: self.received.clone(),
        }
    }

    /// Convenience: spawn the mock on its own worker thread.
    pub fn spawn(
        self,
    ) -> Result<
        (
            crate::service::ServiceClient<Self>,
            ServiceWorker,
            MockExpectations<Req, Resp>,
        ),
        crate::error::FrameworkError,
    > {
        let expectations = self.expectations();
        let name = self.name.clone();
        let (client, worker) = ServiceWorker::spawn(name, self)?;
        Ok((client, worker, expectations))
    }
}

impl<Req, Resp> Service for MockService<Req, Resp>
where
    Req: Clone + Send + Debug + 'static,
    Resp: Send + 'static,
{
    type Request = Req;
    type Response = Resp;

    fn call(&mut self, request: Req) -> Resp {
        self.received.lock().push(request.clone());
        let expectation = self.queue.lock().pop_front();
        match expectation {
            Some(Expectation { response, delay }) => {
                if let Some(delay) = delay {
                    std::thread::sleep(delay);
                }
                response
            }
            None => panic!("{}: unexpected request {:?}", self.name, request),
        }
    }
}

/// Builder for a single expectation.
pub struct ExpectationBuilder<Resp> {
    queue: Arc<Mutex<VecDeque<Expectation<Resp>>>>,
    delay: Option<Duration>,
}

impl<Resp> ExpectationBuilder<Resp> {
    /// Hold the worker for `delay` before answering.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Sets the response for this expectation.
    pub fn respond_with(self, response: Resp) {
        self.queue.lock().push_back(Expectation {
            response,
            delay: self.delay,
        });
    }
}
