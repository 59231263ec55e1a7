//! # Transport Collaborators
//!
//! The relay core never touches sockets directly. It talks to two seams:
//!
//! - [`Transmitter`]: best-effort `transmit(physical, bytes)`; no acknowledgment.
//! - [`PacketSink`]: `on_receive(bytes)`, called once per inbound datagram by
//!   whatever watches the socket. Must return quickly.
//!
//! [`udp`] adapts both to a Tokio `UdpSocket`; [`memory`] is an in-process
//! network for tests and demos.

pub mod memory;
pub mod udp;

pub use memory::*;
pub use udp::*;

use std::net::SocketAddr;

/// Outbound side of the wire.
pub trait Transmitter: Send + Sync {
    /// Hand `bytes` to the network. `Ok` means accepted for sending, not delivered.
    fn transmit(&self, to: SocketAddr, bytes: Vec<u8>) -> std::io::Result<()>;
}

/// Inbound side of the wire.
pub trait PacketSink: Send + Sync {
    fn on_receive(&self, bytes: Vec<u8>);
}
