use crate::model::{Address, LogicalAddress};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::net::SocketAddr;

/// Resolves a logical destination to the socket its node listens on.
pub trait AddressResolver: Send + Sync {
    /// The endpoint registered for `destination`, real or simulated.
    fn resolve_address(&self, destination: &LogicalAddress) -> Option<Address>;

    /// Translate an endpoint to a real socket.
    fn to_physical(&self, address: &Address) -> Option<SocketAddr>;

    fn resolve_physical(&self, destination: &LogicalAddress) -> Option<SocketAddr> {
        self.resolve_address(destination)
            .and_then(|address| self.to_physical(&address))
    }
}

/// Static table of where each logical destination lives.
#[derive(Default)]
pub struct AddressBook {
    logical: RwLock<HashMap<LogicalAddress, Address>>,
    simulated: RwLock<HashMap<u64, SocketAddr>>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `destination` at `address`.
    pub fn insert(&self, destination: impl Into<LogicalAddress>, address: impl Into<Address>) {
        self.logical.write().insert(destination.into(), address.into());
    }

    /// Back simulated slot `slot` with a real socket.
    pub fn bind_simulated(&self, slot: u64, socket: SocketAddr) {
        self.simulated.write().insert(slot, socket);
    }

    pub fn remove(&self, destination: &LogicalAddress) -> Option<Address> {
        self.logical.write().remove(destination)
    }
}

impl AddressResolver for AddressBook {
    fn resolve_address(&self, destination: &LogicalAddress) -> Option<Address> {
        self.logical.read().get(destination).copied()
    }

    fn to_physical(&self, address: &Address) -> Option<SocketAddr> {
        match address {
            Address::Real(socket) => Some(*socket),
            Address::Simulated(slot) => self.simulated.read().get(slot).copied(),
        }
    }
}
