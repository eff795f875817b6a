//! The `utils` module collects pieces shared across `shardsub`: error types
//! and logging setup.

pub mod error;
pub mod logging;

pub use error::{BrokerError, ClientError};
