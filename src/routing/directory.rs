use crate::model::{LogicalAddress, Message};
use actor_framework::Recipient;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Resolves a logical destination to a local actor.
pub trait RouteResolver: Send + Sync {
    fn resolve_route(&self, destination: &LogicalAddress) -> Option<Recipient<Message>>;
}

/// In-memory directory of the actors hosted on this node.
#[derive(Default)]
pub struct LocalDirectory {
    entries: RwLock<HashMap<LogicalAddress, Recipient<Message>>>,
}

impl LocalDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `address` to `recipient`, returning the previous binding.
    pub fn register(
        &self,
        address: impl Into<LogicalAddress>,
        recipient: Recipient<Message>,
    ) -> Option<Recipient<Message>> {
        let address = address.into();
        debug!(%address, actor_id = %recipient.id(), "Route registered");
        self.entries.write().insert(address, recipient)
    }

    pub fn unregister(&self, address: &LogicalAddress) -> Option<Recipient<Message>> {
        let removed = self.entries.write().remove(address);
        if removed.is_some() {
            debug!(%address, "Route removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl RouteResolver for LocalDirectory {
    fn resolve_route(&self, destination: &LogicalAddress) -> Option<Recipient<Message>> {
        self.entries.read().get(destination).cloned()
    }
}
