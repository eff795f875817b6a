//! # shardsub
//!
//! `shardsub` is an in-process publish/subscribe broker. Messages published
//! to a named topic are copied into a bounded mailbox per subscriber, and
//! subscribers pull them one at a time. The topic namespace is sharded across
//! a fixed pool of tokio tasks; each shard owns its topics outright and
//! applies requests strictly in arrival order, so no locks are involved.
//!
//! ## Core Modules
//!
//! - `broker`: shard routing, shard workers, mailboxes and the `Broker` façade.
//! - `client`: HTTP publisher/subscriber simulators for exercising a server.
//! - `config`: loads server and broker settings from file and environment.
//! - `transport`: the axum HTTP adapter in front of a `Broker`.
//! - `utils`: error types and logging setup.

pub mod broker;
pub mod client;
pub mod config;
pub mod transport;
pub mod utils;
