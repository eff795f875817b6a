//! Topic management
//!
//! A `Topic` holds the mailboxes of every subscriber registered under one
//! topic name. Topics exist only inside the shard that owns them; callers
//! never see a `Topic` directly.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use super::mailbox::Mailbox;
use super::message::Message;

pub type SubscriberId = String;

#[derive(Debug, Default)]
pub struct Topic {
    pub name: String,
    pub subscribers: HashMap<SubscriberId, Mailbox>,
}

impl Topic {
    /// Create a new topic with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscribers: HashMap::new(),
        }
    }

    /// Register a subscriber with a fresh, empty mailbox.
    ///
    /// Re-subscribing replaces the existing mailbox; anything it buffered is
    /// discarded. Returns `true` if an earlier mailbox was replaced.
    pub fn subscribe(&mut self, id: SubscriberId, capacity: usize) -> bool {
        self.subscribers.insert(id, Mailbox::new(capacity)).is_some()
    }

    /// Remove a subscriber and its mailbox. Returns `true` if it existed.
    pub fn unsubscribe(&mut self, id: &str) -> bool {
        self.subscribers.remove(id).is_some()
    }

    /// Offer a message to every subscriber. Returns how many mailboxes
    /// accepted it; the rest were full.
    pub fn publish(&mut self, msg: &Arc<Message>) -> usize {
        let mut delivered = 0;
        for (id, mailbox) in self.subscribers.iter_mut() {
            if mailbox.push(Arc::clone(msg)) {
                delivered += 1;
            } else {
                trace!(topic = %self.name, subscriber = %id, "mailbox full, message dropped");
            }
        }
        delivered
    }

    pub fn mailbox_mut(&mut self, id: &str) -> Option<&mut Mailbox> {
        self.subscribers.get_mut(id)
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
