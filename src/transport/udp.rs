use crate::transport::{PacketSink, Transmitter};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

/// Sends datagrams on a shared Tokio socket without ever waiting.
#[derive(Clone)]
pub struct UdpTransmitter {
    socket: Arc<UdpSocket>,
}

impl UdpTransmitter {
    pub fn new(socket: Arc<UdpSocket>) -> Self {
        Self { socket }
    }
}

impl Transmitter for UdpTransmitter {
    fn transmit(&self, to: SocketAddr, bytes: Vec<u8>) -> std::io::Result<()> {
        // A full send buffer means the datagram is lost, as it could be on the wire.
        let sent = self.socket.try_send_to(&bytes, to)?;
        debug!(%to, sent, "Datagram sent");
        Ok(())
    }
}

/// The socket-watch loop: every datagram read is handed to `sink` and forgotten.
///
/// Runs until the task is aborted.
pub async fn watch_socket(socket: Arc<UdpSocket>, sink: Arc<dyn PacketSink>, max_datagram: usize) {
    let local = socket.local_addr().ok();
    info!(?local, "Socket watch started");
    // One spare byte so an oversized datagram is seen as oversized instead of silently truncated.
    let mut buf = vec![0u8; max_datagram + 1];
    loop {
        match socket.recv_from(&mut buf).await {
            Ok((len, from)) => {
                debug!(%from, len, "Datagram received");
                sink.on_receive(buf[..len].to_vec());
            }
            Err(e) => {
                // ICMP errors from earlier sends surface here on some platforms.
                warn!(error = %e, "Socket receive failed");
            }
        }
    }
}
