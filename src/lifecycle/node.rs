use crate::clients::{CryptoClient, SecureSender};
use crate::config::NodeConfig;
use crate::crypto::{CryptoEngine, EngineSnapshot, EngineStats, Ed25519Scheme};
use crate::error::RelayError;
use crate::intake_actor::{IntakeActor, IntakeHandle, IntakeSettings, IntakeSnapshot};
use crate::model::{NodeIdentity, SignerId};
use crate::routing::{AddressResolver, DeadLetter, RouteResolver};
use crate::transport::{watch_socket, PacketSink, Transmitter, UdpTransmitter};
use actor_framework::{FrameworkError, Recipient, ServiceWorker};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// The outside world a node is wired to.
pub struct Collaborators {
    /// Local actors reachable by logical address.
    pub routes: Arc<dyn RouteResolver>,
    /// Where remote logical addresses live.
    pub addresses: Arc<dyn AddressResolver>,
    /// Overrides the UDP transmitter. Required when no `bind` is configured.
    pub transmitter: Option<Arc<dyn Transmitter>>,
    /// Receives unresolved messages under the dead-letter policy.
    pub dead_letters: Option<Recipient<DeadLetter>>,
}

/// One running relay node.
///
/// `RelayNode` is responsible for:
/// - **Wiring**: one crypto worker shared by the send and intake pipelines
/// - **Socket watching**: a UDP receive loop when `bind` is configured
/// - **Housekeeping**: an expiry sweeper when `continuation_ttl_ms` is set
/// - **Shutdown**: releasing its handles and joining what it started
///
/// # Example
///
/// ```ignore
/// let node = RelayNode::start(config, identity, collaborators).await?;
///
/// // Actors send through a clone of the node's sender.
/// node.sender().send(&actor, "actor-7", Message::from("ping"))?;
///
/// // Drop every actor holding a sender clone, then:
/// node.shutdown().await?;
/// ```
pub struct RelayNode {
    config: NodeConfig,
    identity: Arc<NodeIdentity>,
    crypto: CryptoClient,
    sender: SecureSender,
    intake: IntakeHandle,
    sink: Arc<dyn PacketSink>,
    engine_stats: Arc<EngineStats>,
    local_addr: Option<SocketAddr>,
    worker: ServiceWorker,
    intake_task: JoinHandle<()>,
    background: Vec<JoinHandle<()>>,
}

impl RelayNode {
    /// Validates `config`, spawns the Ed25519 crypto worker and intake actor, and
    /// binds the UDP socket if one is configured.
    pub async fn start(
        config: NodeConfig,
        identity: Arc<NodeIdentity>,
        collaborators: Collaborators,
    ) -> Result<Self, RelayError> {
        Self::start_with_engine(config, identity, collaborators, CryptoEngine::new(Ed25519Scheme)).await
    }

    /// Like [`RelayNode::start`], with a caller-supplied engine on the crypto worker.
    pub async fn start_with_engine(
        config: NodeConfig,
        identity: Arc<NodeIdentity>,
        collaborators: Collaborators,
        engine: CryptoEngine,
    ) -> Result<Self, RelayError> {
        config.validate()?;
        let Collaborators {
            routes,
            addresses,
            transmitter,
            dead_letters,
        } = collaborators;
        let name = config.name.clone();
        let max_datagram = config.max_datagram_bytes;

        // 1. The one crypto worker
        let engine_stats = engine.stats();
        let (crypto, worker) = CryptoClient::spawn(format!("crypto-worker-{name}"), engine)?;

        // 2. Intake
        let settings = IntakeSettings {
            max_datagram,
            unresolved_policy: config.unresolved_policy,
            dead_letters,
        };
        let (intake, intake_task) =
            IntakeActor::new(crypto.clone(), routes, settings).start(format!("intake-{name}"));
        let sink: Arc<dyn PacketSink> = Arc::new(intake.clone());

        // 3. Socket
        let mut background = Vec::new();
        let mut local_addr = None;
        let mut udp: Option<Arc<dyn Transmitter>> = None;
        if let Some(bind) = config.bind {
            let socket = Arc::new(UdpSocket::bind(bind).await?);
            local_addr = Some(socket.local_addr()?);
            background.push(tokio::spawn(watch_socket(
                socket.clone(),
                sink.clone(),
                max_datagram,
            )));
            udp = Some(Arc::new(UdpTransmitter::new(socket)));
        }
        let transmitter = transmitter.or(udp).ok_or(RelayError::NoTransmitter)?;

        // 4. Optional expiry of continuations that never come back
        if let Some(ttl) = config.continuation_ttl() {
            let registry = crypto.service().registry().clone();
            let mut tick = tokio::time::interval(config.sweep_interval());
            background.push(tokio::spawn(async move {
                loop {
                    tick.tick().await;
                    let expired = registry.expire_older_than(ttl);
                    if expired > 0 {
                        warn!(registry = registry.name(), expired, "Expired pending continuations");
                    }
                }
            }));
        }

        let sender = SecureSender::new(
            crypto.clone(),
            identity.clone(),
            addresses,
            transmitter,
            max_datagram,
        );

        info!(node = %name, signer = %identity.signer_id(), ?local_addr, "Node started");
        Ok(Self {
            config,
            identity,
            crypto,
            sender,
            intake,
            sink,
            engine_stats,
            local_addr,
            worker,
            intake_task,
            background,
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn signer(&self) -> SignerId {
        self.identity.signer_id()
    }

    /// The bound UDP address, if the node watches a socket.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Clone this into every actor that sends.
    pub fn sender(&self) -> &SecureSender {
        &self.sender
    }

    pub fn crypto(&self) -> &CryptoClient {
        &self.crypto
    }

    pub fn intake(&self) -> &IntakeHandle {
        &self.intake
    }

    /// `OnReceive` entry point for a transport that is not the node's own socket.
    pub fn sink(&self) -> &Arc<dyn PacketSink> {
        &self.sink
    }

    pub fn engine_stats(&self) -> EngineSnapshot {
        self.engine_stats.snapshot()
    }

    pub fn intake_stats(&self) -> IntakeSnapshot {
        self.intake.stats()
    }

    /// Stops the node.
    ///
    /// Background tasks are aborted and the node's own handles dropped. The
    /// intake actor then drains, and the crypto worker exits once the last
    /// sender clone is gone. Actors holding a [`SecureSender`] must be dropped
    /// first, or this times out.
    pub async fn shutdown(self) -> Result<(), RelayError> {
        let RelayNode {
            config,
            crypto,
            sender,
            intake,
            sink,
            worker,
            intake_task,
            background,
            ..
        } = self;
        info!(node = %config.name, "Shutting down node...");

        // Step 1: stop the loops that hold handles
        for task in &background {
            task.abort();
        }

        // Step 2: release our handles so the actor and worker can finish
        drop(sink);
        drop(intake);
        drop(sender);
        drop(crypto);

        // Step 3: wait, bounded
        let timeout = config.shutdown_timeout();
        let drain = async move {
            for task in background {
                // Cancelled is the expected outcome here.
                let _ = task.await;
            }
            intake_task
                .await
                .map_err(|e| FrameworkError::WorkerFailed(format!("intake task: {e}")))?;
            worker.shutdown_async().await?;
            Ok::<(), RelayError>(())
        };
        match tokio::time::timeout(timeout, drain).await {
            Ok(result) => {
                result?;
                info!(node = %config.name, "Node shutdown complete.");
                Ok(())
            }
            Err(_) => {
                error!(node = %config.name, ?timeout, "Node shutdown timed out");
                Err(RelayError::ShutdownTimedOut(timeout))
            }
        }
    }
}
