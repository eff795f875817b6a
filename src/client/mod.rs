//! The `client` module drives a running `shardsub` server over HTTP.
//!
//! It provides two load simulators, used by the `publish` and `subscribe`
//! subcommands: a pool of publishers posting at random intervals and a
//! polling subscriber.

pub mod publisher;
pub mod subscriber;

pub use publisher::PublisherOptions;
pub use subscriber::{PollOutcome, SubscriberOptions};
