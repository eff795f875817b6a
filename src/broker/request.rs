//! Messages exchanged between the `Broker` façade and shard workers.
//!
//! Write requests are fire-and-forget. `Get` carries a one-shot reply
//! channel that the worker answers exactly once.

use tokio::sync::oneshot;

use super::message::Message;
use super::topic::SubscriberId;
use crate::utils::error::BrokerError;

pub type Response = Result<Message, BrokerError>;

#[derive(Debug)]
pub enum Request {
    Subscribe {
        topic: String,
        subscriber: SubscriberId,
    },
    Unsubscribe {
        topic: String,
        subscriber: SubscriberId,
    },
    Publish {
        topic: String,
        message: Message,
    },
    Get {
        topic: String,
        subscriber: SubscriberId,
        reply: oneshot::Sender<Response>,
    },
    Shutdown,
}

impl Request {
    pub fn topic(&self) -> Option<&str> {
        match self {
            Request::Subscribe { topic, .. }
            | Request::Unsubscribe { topic, .. }
            | Request::Publish { topic, .. }
            | Request::Get { topic, .. } => Some(topic),
            Request::Shutdown => None,
        }
    }
}
