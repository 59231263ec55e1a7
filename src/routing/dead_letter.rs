use crate::model::{LogicalAddress, Message};
use serde::{Deserialize, Serialize};

/// What to do with an authenticated message whose destination is not hosted here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedPolicy {
    /// Discard it like any other rejected packet.
    #[default]
    Drop,
    /// Hand it to the dead-letter recipient, if one is configured.
    DeadLetter,
}

/// A message that reached this node for a destination it does not host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLetter {
    pub destination: LogicalAddress,
    pub message: Message,
}
