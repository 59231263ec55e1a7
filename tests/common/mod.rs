#![allow(dead_code)]

use actor_framework::{spawn, Actor, ActorRef, Context, Recipient};
use async_trait::async_trait;
use secure_relay::clients::SecureSender;
use secure_relay::codec::{self, MAX_UDP_DATAGRAM};
use secure_relay::config::NodeConfig;
use secure_relay::lifecycle::{Collaborators, RelayNode};
use secure_relay::model::{Message, NodeIdentity, RoutingTuple};
use secure_relay::routing::{AddressBook, DeadLetter, LocalDirectory};
use secure_relay::transport::MemoryNetwork;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub fn addr_a() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 7401))
}

pub fn addr_b() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 7402))
}

/// Node A sends, node B receives, over one memory network.
pub struct Pair {
    pub network: Arc<MemoryNetwork>,
    pub book: Arc<AddressBook>,
    pub routes_b: Arc<LocalDirectory>,
    pub a: RelayNode,
    pub b: RelayNode,
}

pub struct PairOptions {
    pub config_b: NodeConfig,
    pub dead_letters: Option<Recipient<DeadLetter>>,
    /// When false, datagrams for B are only recorded; tests feed B by hand.
    pub attach_b: bool,
}

impl Default for PairOptions {
    fn default() -> Self {
        Self {
            config_b: NodeConfig::named("node-b"),
            dead_letters: None,
            attach_b: true,
        }
    }
}

impl Pair {
    pub async fn start(options: PairOptions) -> Pair {
        let network = MemoryNetwork::recording();
        let book = Arc::new(AddressBook::new());
        let routes_b = Arc::new(LocalDirectory::new());

        let a = RelayNode::start(
            NodeConfig::named("node-a"),
            Arc::new(NodeIdentity::from_secret_bytes(&[0xa1; 32])),
            Collaborators {
                routes: Arc::new(LocalDirectory::new()),
                addresses: book.clone(),
                transmitter: Some(network.transmitter()),
                dead_letters: None,
            },
        )
        .await
        .unwrap();
        let b = RelayNode::start(
            options.config_b,
            Arc::new(NodeIdentity::from_secret_bytes(&[0xb2; 32])),
            Collaborators {
                routes: routes_b.clone(),
                addresses: book.clone(),
                transmitter: Some(network.transmitter()),
                dead_letters: options.dead_letters,
            },
        )
        .await
        .unwrap();

        network.attach(addr_a(), a.sink());
        if options.attach_b {
            network.attach(addr_b(), b.sink());
        }
        Pair {
            network,
            book,
            routes_b,
            a,
            b,
        }
    }

    /// Place `name` on node B.
    pub fn place_on_b(&self, name: &str) {
        self.book.insert(name, addr_b());
    }

    pub async fn shutdown(self) {
        self.a.shutdown().await.unwrap();
        self.b.shutdown().await.unwrap();
    }
}

/// An actor that reports every message it receives.
pub struct Inbox {
    out: mpsc::UnboundedSender<(String, Message)>,
}

#[async_trait]
impl Actor for Inbox {
    type Message = Message;

    async fn handle(&mut self, msg: Message, ctx: &mut Context<Self>) {
        let _ = self.out.send((ctx.id().to_string(), msg));
    }
}

pub fn host_inbox(
    routes: &LocalDirectory,
    name: &str,
    out: mpsc::UnboundedSender<(String, Message)>,
) -> (ActorRef<Inbox>, JoinHandle<()>) {
    let (inbox, join) = spawn(name, Inbox { out });
    routes.register(name, inbox.recipient());
    (inbox, join)
}

#[derive(Debug)]
pub enum Outbound {
    Send { to: String, text: String },
}

/// An actor that sends on request and reports what each send signed.
pub struct Client {
    pub sender: SecureSender,
    pub signed: mpsc::UnboundedSender<(String, RoutingTuple)>,
}

#[async_trait]
impl Actor for Client {
    type Message = Outbound;

    async fn handle(&mut self, msg: Outbound, ctx: &mut Context<Self>) {
        let Outbound::Send { to, text } = msg;
        let myself = ctx.myself().unwrap();
        self.sender
            .send_then(&myself, to, Message::from(text.as_str()), |me: &mut Client, ctx, signed| {
                let tuple: RoutingTuple = codec::decode(signed.payload(), MAX_UDP_DATAGRAM).unwrap();
                let _ = me.signed.send((ctx.id().to_string(), tuple));
            })
            .unwrap();
    }
}

/// Poll `condition` until it holds, failing the test after five seconds.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    let poll = async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    };
    tokio::time::timeout(Duration::from_secs(5), poll)
        .await
        .expect("condition not reached in time");
}
