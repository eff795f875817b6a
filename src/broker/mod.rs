pub mod engine;
pub mod mailbox;
pub mod message;
pub mod request;
pub mod router;
pub mod shard;
pub mod topic;

pub use engine::Broker;
pub use message::Message;
