//! Subscriber simulator: registers one subscription over HTTP and polls it
//! at a fixed interval, logging every message it pulls.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use crate::broker::Message;
use crate::utils::error::ClientError;

#[derive(Debug, Clone)]
pub struct SubscriberOptions {
    /// Server base URL, e.g. `http://127.0.0.1:3000`.
    pub base_url: String,
    pub topic: String,
    pub name: String,
    pub poll_interval: Duration,
}

/// Result of one `GET /{topic}/{subscriber}`.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Message(Message),
    /// 204: subscribed, nothing pending.
    Empty,
    /// 404: unknown topic or subscriber.
    NotFound,
}

pub fn subscriber_url(base_url: &str, topic: &str, name: &str) -> String {
    format!("{}/{}/{}", base_url.trim_end_matches('/'), topic, name)
}

/// Registers the subscription; the server must answer 201.
pub async fn register(client: &Client, opts: &SubscriberOptions) -> Result<(), ClientError> {
    let url = subscriber_url(&opts.base_url, &opts.topic, &opts.name);
    let status = client.post(&url).send().await?.status();
    if status != StatusCode::CREATED {
        return Err(ClientError::SubscribeRejected {
            topic: opts.topic.clone(),
            subscriber: opts.name.clone(),
            status,
        });
    }
    Ok(())
}

pub async fn poll_once(client: &Client, url: &str) -> Result<PollOutcome, ClientError> {
    let resp = client.get(url).send().await?;
    match resp.status() {
        StatusCode::OK => Ok(PollOutcome::Message(resp.json::<Message>().await?)),
        StatusCode::NO_CONTENT => Ok(PollOutcome::Empty),
        StatusCode::NOT_FOUND => Ok(PollOutcome::NotFound),
        other => Err(ClientError::UnexpectedStatus(other)),
    }
}

/// Registers, then polls until `shutdown` resolves. Returns how many
/// messages were received.
pub async fn run<F>(opts: SubscriberOptions, shutdown: F) -> Result<usize, ClientError>
where
    F: Future<Output = ()>,
{
    let client = Client::new();
    register(&client, &opts).await?;
    info!(topic = %opts.topic, subscriber = %opts.name, "subscribed");

    let url = subscriber_url(&opts.base_url, &opts.topic, &opts.name);
    // interval() rejects a zero period
    let period = opts.poll_interval.max(Duration::from_millis(1));
    let mut ticker = tokio::time::interval(period);
    let mut received = 0;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => match poll_once(&client, &url).await {
                Ok(PollOutcome::Message(msg)) => {
                    received += 1;
                    info!(
                        topic = %opts.topic,
                        published = %msg.published_at,
                        "message: {}",
                        msg.payload
                    );
                }
                Ok(PollOutcome::Empty) => debug!(topic = %opts.topic, "no new messages"),
                Ok(PollOutcome::NotFound) => debug!(topic = %opts.topic, "topic not found"),
                Err(e) => warn!(error = %e, "poll failed"),
            },
        }
    }

    info!(subscriber = %opts.name, received, "subscriber terminated");
    Ok(received)
}
