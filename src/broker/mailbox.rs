//! Per-subscriber mailbox
//!
//! A `Mailbox` is a bounded FIFO of messages waiting to be pulled by one
//! subscriber. Both directions are non-blocking:
//! - `push` on a full mailbox discards the incoming message (lossy under load)
//! - `pop` on an empty mailbox returns `None`
//!
//! Mailboxes live inside a shard worker and are never touched from outside
//! its loop.

use std::collections::VecDeque;
use std::sync::Arc;

use super::message::Message;

#[derive(Debug)]
pub struct Mailbox {
    queue: VecDeque<Arc<Message>>,
    capacity: usize,
}

impl Mailbox {
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            capacity,
        }
    }

    /// Enqueue a message. Returns `false` when the mailbox was full and the
    /// message was dropped.
    pub fn push(&mut self, msg: Arc<Message>) -> bool {
        if self.is_full() {
            return false;
        }
        self.queue.push_back(msg);
        true
    }

    /// Dequeue the oldest message, if any.
    pub fn pop(&mut self) -> Option<Arc<Message>> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.queue.len() >= self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(payload: &str) -> Arc<Message> {
        Arc::new(Message::new(payload))
    }

    #[test]
    fn pops_in_fifo_order() {
        let mut mailbox = Mailbox::new(3);
        assert!(mailbox.push(msg("a")));
        assert!(mailbox.push(msg("b")));

        assert_eq!(mailbox.pop().unwrap().payload, "a");
        assert_eq!(mailbox.pop().unwrap().payload, "b");
        assert!(mailbox.pop().is_none());
    }

    #[test]
    fn full_mailbox_drops_newest() {
        let mut mailbox = Mailbox::new(2);
        assert!(mailbox.push(msg("first")));
        assert!(mailbox.push(msg("second")));
        assert!(mailbox.is_full());

        assert!(!mailbox.push(msg("third")));
        assert_eq!(mailbox.len(), 2);
        assert_eq!(mailbox.pop().unwrap().payload, "first");
        assert_eq!(mailbox.pop().unwrap().payload, "second");
    }

    #[test]
    fn huge_capacity_allocates_on_demand() {
        let mut mailbox = Mailbox::new(usize::MAX);
        assert!(mailbox.is_empty());
        assert!(!mailbox.is_full());
        assert!(mailbox.push(msg("x")));
        assert_eq!(mailbox.pop().unwrap().payload, "x");
    }

    #[test]
    fn zero_capacity_accepts_nothing() {
        let mut mailbox = Mailbox::new(0);
        assert!(!mailbox.push(msg("x")));
        assert!(mailbox.is_empty());
    }
}
