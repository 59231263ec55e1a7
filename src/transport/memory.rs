use crate::transport::{PacketSink, Transmitter};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Weak};
use tracing::trace;

/// An in-process network: datagrams sent to an attached address are delivered
/// straight to that node's sink.
///
/// A network built with [`MemoryNetwork::recording`] also keeps a copy of every
/// datagram until [`MemoryNetwork::take_sent`] drains it.
#[derive(Default)]
pub struct MemoryNetwork {
    nodes: RwLock<HashMap<SocketAddr, Weak<dyn PacketSink>>>,
    record: bool,
    sent: Mutex<Vec<(SocketAddr, Vec<u8>)>>,
}

impl MemoryNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A network that records everything transmitted on it.
    pub fn recording() -> Arc<Self> {
        Arc::new(Self {
            record: true,
            ..Self::default()
        })
    }

    /// Deliver datagrams for `address` to `sink`. The network does not keep the sink alive.
    pub fn attach(&self, address: SocketAddr, sink: &Arc<dyn PacketSink>) {
        self.nodes.write().insert(address, Arc::downgrade(sink));
    }

    pub fn detach(&self, address: &SocketAddr) {
        self.nodes.write().remove(address);
    }

    /// A transmitter that sends into this network.
    pub fn transmitter(self: &Arc<Self>) -> Arc<dyn Transmitter> {
        Arc::new(MemoryTransmitter {
            network: self.clone(),
        })
    }

    /// Drain the record of everything transmitted so far. Always empty unless recording.
    pub fn take_sent(&self) -> Vec<(SocketAddr, Vec<u8>)> {
        std::mem::take(&mut *self.sent.lock())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    fn deliver(&self, to: SocketAddr, bytes: Vec<u8>) {
        if self.record {
            self.sent.lock().push((to, bytes.clone()));
        }
        let sink = self.nodes.read().get(&to).and_then(Weak::upgrade);
        match sink {
            Some(sink) => sink.on_receive(bytes),
            None => trace!(%to, "No node attached; datagram lost"),
        }
    }
}

struct MemoryTransmitter {
    network: Arc<MemoryNetwork>,
}

impl Transmitter for MemoryTransmitter {
    fn transmit(&self, to: SocketAddr, bytes: Vec<u8>) -> io::Result<()> {
        self.network.deliver(to, bytes);
        Ok(())
    }
}
