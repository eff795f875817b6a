use serde::{Deserialize, Serialize};

/// Body of `POST /{topic}`.
///
/// Older clients send the capitalised `Message` key; both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishRequest {
    #[serde(alias = "Message")]
    pub message: String,
}
