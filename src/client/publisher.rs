//! Publisher simulator: `publishers` concurrent tasks, each posting numbered
//! messages to its own topic at random intervals.
//!
//! Publisher `i` (1-based) posts `"{message}{n}"` to topic `"{topic}{i}"`.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use reqwest::{Client, StatusCode};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::transport::message::PublishRequest;
use crate::utils::error::ClientError;

#[derive(Debug, Clone)]
pub struct PublisherOptions {
    pub base_url: String,
    pub topic: String,
    pub message: String,
    /// Upper bound (exclusive) of the random pause between two posts.
    pub max_interval: Duration,
    pub publishers: usize,
}

pub fn topic_url(base_url: &str, topic: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), topic)
}

/// Posts one message; the server must answer 204.
pub async fn publish_once(client: &Client, url: &str, message: String) -> Result<(), ClientError> {
    let status = client
        .post(url)
        .json(&PublishRequest { message })
        .send()
        .await?
        .status();
    if status != StatusCode::NO_CONTENT {
        return Err(ClientError::UnexpectedStatus(status));
    }
    Ok(())
}

fn random_delay(max: Duration) -> Duration {
    let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..max_ms))
}

/// Runs every publisher until `shutdown` resolves. Returns the number of
/// messages the server accepted.
pub async fn run<F>(opts: PublisherOptions, shutdown: F) -> usize
where
    F: Future<Output = ()> + Send + 'static,
{
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown.await;
        let _ = stop_tx.send(true);
    });

    let client = Client::new();
    let tasks = (1..=opts.publishers).map(|id| {
        let client = client.clone();
        let mut stop = stop_rx.clone();
        let url = topic_url(&opts.base_url, &format!("{}{}", opts.topic, id));
        let message = opts.message.clone();
        let max_interval = opts.max_interval;

        tokio::spawn(async move {
            let mut sent = 0usize;
            let mut n = 0usize;
            loop {
                tokio::select! {
                    _ = stop.changed() => break,
                    _ = tokio::time::sleep(random_delay(max_interval)) => {
                        n += 1;
                        let body = format!("{message}{n}");
                        match publish_once(&client, &url, body).await {
                            Ok(()) => sent += 1,
                            Err(e) => warn!(url = %url, error = %e, "error publishing message"),
                        }
                    }
                }
            }
            sent
        })
    });

    let total: usize = futures::future::join_all(tasks)
        .await
        .into_iter()
        .filter_map(Result::ok)
        .sum();

    info!(published = total, "publishers terminated");
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_delay_stays_below_bound() {
        let max = Duration::from_millis(20);
        for _ in 0..100 {
            assert!(random_delay(max) < max);
        }
        assert_eq!(random_delay(Duration::ZERO), Duration::ZERO);
        assert!(random_delay(Duration::MAX) < Duration::MAX);
    }

    #[test]
    fn topic_url_joins_cleanly() {
        assert_eq!(topic_url("http://h:1/", "jobs1"), "http://h:1/jobs1");
        assert_eq!(topic_url("http://h:1", "jobs1"), "http://h:1/jobs1");
    }
}
