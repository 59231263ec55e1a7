//! Two nodes on an in-process network. `pinger` on node A sends a signed "ping"
//! to `actor-7` on node B.

use actor_framework::{spawn, Actor, Context};
use async_trait::async_trait;
use secure_relay::clients::SecureSender;
use secure_relay::config::NodeConfig;
use secure_relay::lifecycle::{setup_tracing, Collaborators, RelayNode};
use secure_relay::model::{Address, LogicalAddress, Message, NodeIdentity};
use secure_relay::routing::{AddressBook, LocalDirectory};
use secure_relay::transport::MemoryNetwork;
use secure_relay::RelayError;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, Instrument};

#[derive(Debug)]
enum PingerMsg {
    Send { to: LogicalAddress, text: String },
}

struct Pinger {
    sender: SecureSender,
}

#[async_trait]
impl Actor for Pinger {
    type Message = PingerMsg;

    async fn handle(&mut self, msg: PingerMsg, ctx: &mut Context<Self>) {
        let PingerMsg::Send { to, text } = msg;
        let Some(myself) = ctx.myself() else { return };
        let sent = self.sender.send_then(&myself, to.clone(), Message::from(text.as_str()), move |_: &mut Pinger, _, signed| {
            info!(%to, signer = %signed.signer(), "Handed to transmitter");
        });
        if let Err(e) = sent {
            error!(error = %e, "Send failed");
        }
    }
}

/// Forwards whatever it receives to `main`.
struct Printer {
    out: mpsc::UnboundedSender<Message>,
}

#[async_trait]
impl Actor for Printer {
    type Message = Message;

    async fn handle(&mut self, msg: Message, ctx: &mut Context<Self>) {
        info!(at = %ctx.id(), text = msg.as_text().unwrap_or("<binary>"), "Received");
        let _ = self.out.send(msg);
    }
}

#[tokio::main]
async fn main() -> Result<(), RelayError> {
    setup_tracing();

    let network = MemoryNetwork::new();
    let addr_a = SocketAddr::from(([127, 0, 0, 1], 7401));
    let addr_b = SocketAddr::from(([127, 0, 0, 1], 7402));

    // actor-7 lives on simulated slot 2, which is backed by node B's socket.
    let book = Arc::new(AddressBook::new());
    book.insert("pinger", addr_a);
    book.insert("actor-7", Address::Simulated(2));
    book.bind_simulated(2, addr_b);

    let routes_a = Arc::new(LocalDirectory::new());
    let routes_b = Arc::new(LocalDirectory::new());

    let node_a = RelayNode::start(
        NodeConfig::named("node-a"),
        Arc::new(NodeIdentity::generate()),
        Collaborators {
            routes: routes_a,
            addresses: book.clone(),
            transmitter: Some(network.transmitter()),
            dead_letters: None,
        },
    )
    .await?;
    let node_b = RelayNode::start(
        NodeConfig::named("node-b"),
        Arc::new(NodeIdentity::generate()),
        Collaborators {
            routes: routes_b.clone(),
            addresses: book,
            transmitter: Some(network.transmitter()),
            dead_letters: None,
        },
    )
    .await?;
    network.attach(addr_a, node_a.sink());
    network.attach(addr_b, node_b.sink());

    let (out, mut received) = mpsc::unbounded_channel();
    let (printer, printer_task) = spawn("actor-7", Printer { out });
    routes_b.register("actor-7", printer.recipient());
    let (pinger, pinger_task) = spawn(
        "pinger",
        Pinger {
            sender: node_a.sender().clone(),
        },
    );

    let span = tracing::info_span!("ping");
    async {
        pinger.tell(PingerMsg::Send {
            to: "actor-7".into(),
            text: "ping".into(),
        })?;
        match tokio::time::timeout(Duration::from_secs(5), received.recv()).await {
            Ok(Some(msg)) => info!(text = msg.as_text().unwrap_or("<binary>"), "Round trip complete"),
            _ => error!("Nothing arrived at actor-7"),
        }
        Ok::<(), RelayError>(())
    }
    .instrument(span)
    .await?;

    info!(a = ?node_a.engine_stats(), b = ?node_b.engine_stats(), intake_b = ?node_b.intake_stats(), "Stats");

    // Actors first, then the nodes they depend on.
    drop(pinger);
    routes_b.unregister(&"actor-7".into());
    drop(printer);
    for task in [pinger_task, printer_task] {
        if let Err(e) = task.await {
            error!(error = %e, "Actor task failed");
        }
    }
    node_a.shutdown().await?;
    node_b.shutdown().await?;
    Ok(())
}
