mod settings;

use ::config::{Config, ConfigError, Environment, File};

use settings::PartialSettings;

pub use settings::{BrokerSettings, ServerSettings, Settings};

/// Prefix for environment overrides, e.g.
/// `SHARDSUB_BROKER__MAX_OUTSTANDING_MESSAGES=10`.
pub const ENV_PREFIX: &str = "SHARDSUB";

/// Loads the configuration from `config/default` (if present) and
/// environment variables, then merges it over the default values.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(merge(partial, Settings::default()))
}

fn merge(partial: PartialSettings, default: Settings) -> Settings {
    let server = partial.server;
    let broker = partial.broker;

    Settings {
        server: ServerSettings {
            host: server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
        },
        broker: BrokerSettings {
            max_outstanding_messages: broker
                .as_ref()
                .and_then(|b| b.max_outstanding_messages)
                .unwrap_or(default.broker.max_outstanding_messages),
            request_queue_size: broker
                .as_ref()
                .and_then(|b| b.request_queue_size)
                .unwrap_or(default.broker.request_queue_size),
            shard_count: broker
                .as_ref()
                .and_then(|b| b.shard_count)
                .or(default.broker.shard_count),
            prune_empty_topics: broker
                .as_ref()
                .and_then(|b| b.prune_empty_topics)
                .unwrap_or(default.broker.prune_empty_topics),
        },
        log_level: partial.log_level.unwrap_or(default.log_level),
    }
}
