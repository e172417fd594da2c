//! Ordered message batch exchanged once per cycle.

use serde::{Deserialize, Serialize};

/// An ordered batch of messages.
///
/// Messages keep the order in which they were sent; nothing is ever
/// reordered or deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mailbox<M> {
    messages: Vec<M>,
}

impl<M> Mailbox<M> {
    /// Create an empty mailbox.
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Append a message to the end of the batch.
    pub fn send(&mut self, message: M) {
        self.messages.push(message);
    }

    /// Read the `i`-th message, if present.
    pub fn read(&self, i: usize) -> Option<&M> {
        self.messages.get(i)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, M> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[M] {
        &self.messages
    }

    /// Remove all messages, keeping the allocation.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn into_vec(self) -> Vec<M> {
        self.messages
    }
}

impl<M: PartialEq> Mailbox<M> {
    /// Whether at least one message equal to `message` is in the batch.
    pub fn contains(&self, message: &M) -> bool {
        self.messages.contains(message)
    }
}

impl<M> Default for Mailbox<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> From<Vec<M>> for Mailbox<M> {
    fn from(messages: Vec<M>) -> Self {
        Self { messages }
    }
}

impl<M> FromIterator<M> for Mailbox<M> {
    fn from_iter<I: IntoIterator<Item = M>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

impl<'a, M> IntoIterator for &'a Mailbox<M> {
    type Item = &'a M;
    type IntoIter = std::slice::Iter<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
