//! The `error` module defines the error types used within `shardsub`.
//!
//! `BrokerError` is the closed set of outcomes a `Get` can report besides a
//! message. Subscribe, unsubscribe and publish never fail from the caller's
//! perspective, so they have no error type of their own.
//!
//! `ClientError` covers the HTTP simulators in `crate::client`.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BrokerError {
    #[error("topic not found")]
    TopicNotFound,

    #[error("subscriber not found")]
    SubscriberNotFound,

    #[error("no new messages for subscriber")]
    NoNewMessages,

    /// The owning shard stopped before answering. A healthy broker never
    /// produces this; it means the worker task is gone.
    #[error("shard worker is no longer running")]
    ShardClosed,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("subscription to {topic}/{subscriber} rejected with status {status}")]
    SubscribeRejected {
        topic: String,
        subscriber: String,
        status: StatusCode,
    },

    #[error("unexpected status {0}")]
    UnexpectedStatus(StatusCode),
}
