use axum::http::StatusCode;

use super::http::status_for;
use super::message::PublishRequest;
use crate::utils::error::BrokerError;

#[test]
fn test_status_for_broker_errors() {
    assert_eq!(status_for(BrokerError::TopicNotFound), StatusCode::NOT_FOUND);
    assert_eq!(
        status_for(BrokerError::SubscriberNotFound),
        StatusCode::NOT_FOUND
    );
    assert_eq!(status_for(BrokerError::NoNewMessages), StatusCode::NO_CONTENT);
    assert_eq!(
        status_for(BrokerError::ShardClosed),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[test]
fn test_deserialize_publish_request() {
    let req: PublishRequest = serde_json::from_str(r#"{"message": "doctor1"}"#).unwrap();
    assert_eq!(req.message, "doctor1");
}

#[test]
fn test_deserialize_publish_request_capitalised_key() {
    let req: PublishRequest = serde_json::from_str(r#"{"Message": "doctor2"}"#).unwrap();
    assert_eq!(req.message, "doctor2");
}

#[test]
fn test_deserialize_publish_request_missing_message() {
    assert!(serde_json::from_str::<PublishRequest>(r#"{"payload": "x"}"#).is_err());
}
