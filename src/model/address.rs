use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;

/// Logical destination identifier of an actor, independent of where it runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LogicalAddress(String);

impl LogicalAddress {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LogicalAddress {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for LogicalAddress {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A node endpoint, either a real socket or a slot in a simulated network.
///
/// Simulated endpoints only become reachable through an
/// [`AddressResolver`](crate::routing::AddressResolver) that maps them onto a
/// real socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Address {
    Real(SocketAddr),
    Simulated(u64),
}

impl Address {
    pub fn is_simulated(&self) -> bool {
        matches!(self, Address::Simulated(_))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Real(addr) => write!(f, "{addr}"),
            Address::Simulated(slot) => write!(f, "sim:{slot}"),
        }
    }
}

impl From<SocketAddr> for Address {
    fn from(addr: SocketAddr) -> Self {
        Address::Real(addr)
    }
}
