use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published message.
///
/// Immutable once created: the broker shares one `Arc<Message>` between all
/// mailboxes it was delivered to and hands out owned copies on `get`.
///
/// # Example
///
/// ```rust
/// use shardsub::broker::Message;
///
/// let msg = Message::new("{\"temp\":25}");
/// assert_eq!(msg.payload, "{\"temp\":25}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "message")]
    pub payload: String,
    #[serde(rename = "published")]
    pub published_at: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current time.
    pub fn new(payload: impl Into<String>) -> Self {
        Self::at(payload, Utc::now())
    }

    pub fn at(payload: impl Into<String>, published_at: DateTime<Utc>) -> Self {
        Self {
            payload: payload.into(),
            published_at,
        }
    }
}
