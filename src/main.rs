//! CLI for shardsub
//!
//! Subcommands:
//! - `server`: run the HTTP broker
//! - `publish`: run publisher simulators against a server
//! - `subscribe`: run a polling subscriber against a server

use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use shardsub::broker::Broker;
use shardsub::client::{PublisherOptions, SubscriberOptions, publisher, subscriber};
use shardsub::config::{Settings, load_config};
use shardsub::transport::http;
use shardsub::utils::logging;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "shardsub", version, about)]
struct Cli {
    /// Log level (error, warn, info, debug, trace); overrides configuration
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP broker server
    Server(ServerArgs),
    /// Publish numbered messages to one or more topics at random intervals
    Publish(PublishArgs),
    /// Subscribe to a topic and poll it for new messages
    Subscribe(SubscribeArgs),
}

#[derive(Args)]
struct ServerArgs {
    /// Address to bind to
    #[arg(long, alias = "ip")]
    host: Option<String>,
    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,
    /// Maximum number of messages buffered per subscriber
    #[arg(long)]
    max_outstanding: Option<usize>,
    /// Number of shard workers
    #[arg(long)]
    shards: Option<usize>,
}

#[derive(Args)]
struct PublishArgs {
    #[arg(long, default_value = "127.0.0.1")]
    ip: String,
    #[arg(long, default_value_t = 3000)]
    port: u16,
    /// Topic prefix; publisher i posts to "{topic}{i}"
    #[arg(long, default_value = "topic")]
    topic: String,
    /// Message prefix; the n-th post is "{message}{n}"
    #[arg(long, default_value = "message")]
    message: String,
    /// Maximum pause between posts, in milliseconds
    #[arg(long, default_value_t = 500)]
    interval: u64,
    /// Number of concurrent publishers (and topics)
    #[arg(long, default_value_t = 1)]
    num: usize,
}

#[derive(Args)]
struct SubscribeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    ip: String,
    #[arg(long, default_value_t = 3000)]
    port: u16,
    #[arg(long, default_value = "sample_topic")]
    topic: String,
    /// Subscriber name; generated when omitted
    #[arg(long)]
    name: Option<String>,
    /// Poll interval in milliseconds
    #[arg(long, default_value_t = 500)]
    poll: u64,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            logging::init(cli.log_level.as_deref().unwrap_or("info"));
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    logging::init(cli.log_level.as_deref().unwrap_or(&settings.log_level));

    let result = match cli.command {
        Command::Server(args) => run_server(settings, args).await,
        Command::Publish(args) => {
            run_publishers(args).await;
            Ok(())
        }
        Command::Subscribe(args) => run_subscriber(args).await,
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received. Exiting gracefully.");
}

async fn run_server(
    mut settings: Settings,
    args: ServerArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    if let Some(max) = args.max_outstanding {
        settings.broker.max_outstanding_messages = max;
    }
    if args.shards.is_some() {
        settings.broker.shard_count = args.shards;
    }

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    let broker = Arc::new(Broker::from_settings(&settings.broker));

    http::serve(broker.clone(), listener, shutdown_signal()).await?;

    match Arc::try_unwrap(broker) {
        Ok(broker) => broker.close().await,
        Err(_) => warn!("Broker still referenced after server exit; workers stop when dropped"),
    }
    Ok(())
}

async fn run_publishers(args: PublishArgs) {
    let opts = PublisherOptions {
        base_url: format!("http://{}:{}", args.ip, args.port),
        topic: args.topic,
        message: args.message,
        max_interval: Duration::from_millis(args.interval),
        publishers: args.num,
    };
    publisher::run(opts, shutdown_signal()).await;
}

async fn run_subscriber(args: SubscribeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let opts = SubscriberOptions {
        base_url: format!("http://{}:{}", args.ip, args.port),
        topic: args.topic,
        name: args
            .name
            .unwrap_or_else(|| format!("sub-{}", uuid::Uuid::new_v4())),
        poll_interval: Duration::from_millis(args.poll),
    };
    subscriber::run(opts, shutdown_signal()).await?;
    Ok(())
}
