//! The `transport` module exposes the broker to other processes over HTTP.
//!
//! It defines the JSON bodies the server accepts and the axum routes that
//! translate requests into broker operations and broker outcomes into
//! status codes.

pub mod http;
pub mod message;

#[cfg(test)]
mod tests;
