use crate::model::address::LogicalAddress;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque application payload with an optional tag.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    payload: Vec<u8>,
    tag: Option<String>,
}

impl Message {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            tag: None,
        }
    }

    pub fn tagged(tag: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            tag: Some(tag.into()),
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// The payload as UTF-8, if it is.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Message");
        match self.as_text() {
            Some(text) => s.field("text", &text),
            None => s.field("bytes", &self.payload.len()),
        };
        s.field("tag", &self.tag).finish()
    }
}

/// The unsigned pair that gets signed: where it goes and what it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingTuple {
    destination: LogicalAddress,
    message: Message,
}

impl RoutingTuple {
    pub fn new(destination: LogicalAddress, message: Message) -> Self {
        Self {
            destination,
            message,
        }
    }

    pub fn destination(&self) -> &LogicalAddress {
        &self.destination
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn into_parts(self) -> (LogicalAddress, Message) {
        (self.destination, self.message)
    }
}
