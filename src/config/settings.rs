use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for the HTTP server, the message broker and logging.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub server: ServerSettings,
    pub broker: BrokerSettings,
    pub log_level: String,
}

/// Configuration settings for the server.
///
/// Defines the host and port the HTTP transport binds to.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Configuration settings for the broker.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BrokerSettings {
    /// Capacity of every subscriber mailbox.
    pub max_outstanding_messages: usize,
    /// Capacity of each shard's request queue.
    pub request_queue_size: usize,
    /// Number of shard workers; `None` picks one less than the CPU count.
    pub shard_count: Option<usize>,
    /// Drop a topic entry once its last subscriber leaves.
    pub prune_empty_topics: bool,
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            max_outstanding_messages: 50,
            request_queue_size: 100,
            shard_count: None,
            prune_empty_topics: false,
        }
    }
}

/// Partial configuration settings loaded from files or environment.
///
/// Missing values are filled from `Settings::default()`.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub broker: Option<PartialBrokerSettings>,
    pub log_level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct PartialBrokerSettings {
    pub max_outstanding_messages: Option<usize>,
    pub request_queue_size: Option<usize>,
    pub shard_count: Option<usize>,
    pub prune_empty_topics: Option<bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            broker: BrokerSettings::default(),
            log_level: "info".to_string(),
        }
    }
}
