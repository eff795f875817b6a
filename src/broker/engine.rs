//! Broker engine
//!
//! `Broker` is the façade over a fixed pool of shard workers. It owns one
//! bounded request queue per shard and routes every operation to the shard
//! that owns the topic (see `router::shard_index`).
//!
//! Concurrency and usage notes:
//! - Construction spawns the workers with `tokio::spawn`, so it must run
//!   inside a tokio runtime.
//! - `subscribe`, `unsubscribe` and `publish` only wait while the target
//!   shard's queue is full; they never wait for the request to be applied.
//! - `get` is a round trip through the shard loop and therefore observes
//!   every request for that topic that was queued before it.
//! - Requests for topics on different shards are processed in parallel and
//!   carry no ordering relative to each other.
//! - `close` consumes the broker; dropping it without closing also stops the
//!   workers once their queues drain.

use tokio::sync::mpsc::{self, Sender};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::broker::message::Message;
use crate::broker::request::{Request, Response};
use crate::broker::router::{default_shard_count, shard_index};
use crate::broker::shard::{ShardState, ShardWorker};
use crate::config::BrokerSettings;
use crate::utils::error::BrokerError;

#[derive(Debug)]
pub struct Broker {
    shards: Vec<Sender<Request>>,
    workers: Vec<JoinHandle<()>>,
}

impl Broker {
    /// Creates a broker whose mailboxes hold at most
    /// `max_outstanding_messages` each, with the default shard count.
    pub fn new(max_outstanding_messages: usize) -> Self {
        Self::from_settings(&BrokerSettings {
            max_outstanding_messages,
            ..BrokerSettings::default()
        })
    }

    pub fn with_shard_count(max_outstanding_messages: usize, shard_count: usize) -> Self {
        Self::from_settings(&BrokerSettings {
            max_outstanding_messages,
            shard_count: Some(shard_count),
            ..BrokerSettings::default()
        })
    }

    pub fn from_settings(settings: &BrokerSettings) -> Self {
        let shard_count = settings
            .shard_count
            .unwrap_or_else(default_shard_count)
            .max(1);
        let queue_size = settings.request_queue_size.max(1);

        let mut shards = Vec::with_capacity(shard_count);
        let mut workers = Vec::with_capacity(shard_count);

        for id in 0..shard_count {
            let (tx, rx) = mpsc::channel(queue_size);
            let state = ShardState::new(
                settings.max_outstanding_messages,
                settings.prune_empty_topics,
            );
            workers.push(tokio::spawn(ShardWorker::new(id, state, rx).run()));
            shards.push(tx);
        }

        info!(
            shards = shard_count,
            mailbox_capacity = settings.max_outstanding_messages,
            queue_size,
            "broker started"
        );

        Self { shards, workers }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Index of the shard that owns `topic`.
    pub fn shard_for(&self, topic: &str) -> usize {
        shard_index(topic, self.shards.len())
    }

    /// Registers `subscriber` on `topic` with a fresh, empty mailbox.
    /// Subscribing again under the same name discards the old mailbox.
    pub async fn subscribe(&self, topic: impl Into<String>, subscriber: impl Into<String>) {
        let topic = topic.into();
        let shard = self.shard_for(&topic);
        let request = Request::Subscribe {
            topic,
            subscriber: subscriber.into(),
        };
        self.dispatch(shard, request).await;
    }

    /// Removes `subscriber` from `topic` and discards its pending messages.
    /// No-op if it is not subscribed.
    pub async fn unsubscribe(&self, topic: impl Into<String>, subscriber: impl Into<String>) {
        let topic = topic.into();
        let shard = self.shard_for(&topic);
        let request = Request::Unsubscribe {
            topic,
            subscriber: subscriber.into(),
        };
        self.dispatch(shard, request).await;
    }

    /// Offers `message` to every current subscriber of `topic`. Never fails:
    /// subscribers whose mailbox is full silently miss it.
    pub async fn publish(&self, topic: impl Into<String>, message: Message) {
        let topic = topic.into();
        let shard = self.shard_for(&topic);
        self.dispatch(shard, Request::Publish { topic, message }).await;
    }

    /// Pulls the oldest pending message for `subscriber` on `topic`.
    ///
    /// # Errors
    ///
    /// - `TopicNotFound` if nobody ever subscribed to `topic`
    /// - `SubscriberNotFound` if `subscriber` is not subscribed to it
    /// - `NoNewMessages` if the mailbox is empty
    /// - `ShardClosed` if the owning worker is no longer running
    pub async fn get(&self, topic: impl Into<String>, subscriber: impl Into<String>) -> Response {
        let topic = topic.into();
        let shard = self.shard_for(&topic);
        let (reply, response) = oneshot::channel();
        let request = Request::Get {
            topic,
            subscriber: subscriber.into(),
            reply,
        };

        if !self.dispatch(shard, request).await {
            return Err(BrokerError::ShardClosed);
        }
        response.await.unwrap_or(Err(BrokerError::ShardClosed))
    }

    /// Stops every shard and waits for the workers to exit. All topics and
    /// buffered messages are released.
    pub async fn close(self) {
        for (id, shard) in self.shards.iter().enumerate() {
            if shard.send(Request::Shutdown).await.is_err() {
                warn!(shard = id, "shard already stopped");
            }
        }
        drop(self.shards);

        for (id, worker) in self.workers.into_iter().enumerate() {
            if let Err(e) = worker.await {
                warn!(shard = id, error = %e, "shard worker ended abnormally");
            }
        }
        info!("broker closed");
    }

    /// Stops a single shard worker, leaving the others running.
    #[cfg(test)]
    pub(crate) async fn stop_shard(&self, shard: usize) {
        let _ = self.shards[shard].send(Request::Shutdown).await;
        self.shards[shard].closed().await;
    }

    async fn dispatch(&self, shard: usize, request: Request) -> bool {
        if self.shards[shard].send(request).await.is_err() {
            warn!(shard, "shard worker is not running, request dropped");
            return false;
        }
        true
    }
}
