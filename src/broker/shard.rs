//! Shard workers
//!
//! A shard owns one partition of the topic namespace. All of its state lives
//! in a `ShardState` that only the shard's own task touches, so requests for
//! a topic are applied strictly in the order they arrived on the shard's
//! queue and no locking is needed.
//!
//! - `ShardState` is the synchronous transition table (subscribe,
//!   unsubscribe, publish, get).
//! - `ShardWorker` wraps it in a loop over a bounded `mpsc` receiver and
//!   answers `Get` requests through their one-shot reply channel.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::Receiver;
use tracing::{debug, info, trace, warn};

use super::message::Message;
use super::request::{Request, Response};
use super::topic::{SubscriberId, Topic};
use crate::utils::error::BrokerError;

#[derive(Debug)]
pub struct ShardState {
    pub topics: HashMap<String, Topic>,
    mailbox_capacity: usize,
    prune_empty_topics: bool,
}

impl ShardState {
    pub fn new(mailbox_capacity: usize, prune_empty_topics: bool) -> Self {
        Self {
            topics: HashMap::new(),
            mailbox_capacity,
            prune_empty_topics,
        }
    }

    /// Registers `subscriber` on `topic`, creating the topic on first use.
    /// Returns `true` when an existing mailbox was replaced.
    pub fn subscribe(&mut self, topic: &str, subscriber: SubscriberId) -> bool {
        self.topics
            .entry(topic.to_string())
            .or_insert_with(|| Topic::new(topic))
            .subscribe(subscriber, self.mailbox_capacity)
    }

    /// Removes `subscriber` from `topic`. Unknown topics or subscribers are a
    /// no-op. Returns `true` when a subscription was removed.
    pub fn unsubscribe(&mut self, topic: &str, subscriber: &str) -> bool {
        let Some(t) = self.topics.get_mut(topic) else {
            return false;
        };
        let removed = t.unsubscribe(subscriber);
        if self.prune_empty_topics && t.is_empty() {
            self.topics.remove(topic);
        }
        removed
    }

    /// Offers `message` to every current subscriber of `topic`. Returns the
    /// number of mailboxes that accepted it.
    pub fn publish(&mut self, topic: &str, message: Message) -> usize {
        match self.topics.get_mut(topic) {
            Some(t) => t.publish(&Arc::new(message)),
            None => 0,
        }
    }

    /// Pulls the oldest pending message for `subscriber` on `topic`.
    pub fn get(&mut self, topic: &str, subscriber: &str) -> Response {
        let t = self
            .topics
            .get_mut(topic)
            .ok_or(BrokerError::TopicNotFound)?;
        let mailbox = t
            .mailbox_mut(subscriber)
            .ok_or(BrokerError::SubscriberNotFound)?;
        mailbox
            .pop()
            .map(Arc::unwrap_or_clone)
            .ok_or(BrokerError::NoNewMessages)
    }

    /// Drops every topic and mailbox.
    pub fn release(&mut self) {
        self.topics.clear();
    }
}

pub struct ShardWorker {
    id: usize,
    state: ShardState,
    requests: Receiver<Request>,
}

impl ShardWorker {
    pub fn new(id: usize, state: ShardState, requests: Receiver<Request>) -> Self {
        Self {
            id,
            state,
            requests,
        }
    }

    /// Processes requests one at a time until `Shutdown` arrives or every
    /// sender has been dropped, then releases all mailboxes.
    pub async fn run(mut self) {
        info!(shard = self.id, "shard worker started");

        while let Some(request) = self.requests.recv().await {
            trace!(shard = self.id, topic = ?request.topic(), "request received");
            if !self.handle(request) {
                break;
            }
        }

        let topics = self.state.topics.len();
        self.state.release();
        self.requests.close();
        info!(shard = self.id, topics, "shard worker stopped");
    }

    /// Applies one request. Returns `false` when the loop should stop.
    fn handle(&mut self, request: Request) -> bool {
        match request {
            Request::Subscribe { topic, subscriber } => {
                let replaced = self.state.subscribe(&topic, subscriber.clone());
                debug!(
                    shard = self.id,
                    topic = %topic,
                    subscriber = %subscriber,
                    replaced,
                    "subscriber registered"
                );
            }
            Request::Unsubscribe { topic, subscriber } => {
                let removed = self.state.unsubscribe(&topic, &subscriber);
                debug!(
                    shard = self.id,
                    topic = %topic,
                    subscriber = %subscriber,
                    removed,
                    "subscriber removed"
                );
            }
            Request::Publish { topic, message } => {
                let delivered = self.state.publish(&topic, message);
                trace!(shard = self.id, topic = %topic, delivered, "message published");
            }
            Request::Get {
                topic,
                subscriber,
                reply,
            } => {
                let response = self.state.get(&topic, &subscriber);
                if reply.send(response).is_err() {
                    warn!(
                        shard = self.id,
                        topic = %topic,
                        subscriber = %subscriber,
                        "get caller went away before the reply"
                    );
                }
            }
            Request::Shutdown => return false,
        }
        true
    }
}
