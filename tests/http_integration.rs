//! HTTP transport integration tests.
//!
//! Starts the axum router on an ephemeral port and exercises it with reqwest.

use std::sync::Arc;

use serde_json::json;
use shardsub::broker::{Broker, Message};
use shardsub::transport::http;

/// Bind to port 0 and return the base URL.
async fn start_server(broker: Broker) -> String {
    let app = http::router(Arc::new(broker));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn subscribe_publish_get_roundtrip() {
    let base = start_server(Broker::with_shard_count(10, 2)).await;
    let client = reqwest::Client::new();

    let resp = client.post(format!("{base}/jobs/alice")).send().await.unwrap();
    assert_eq!(resp.status(), 201);

    let resp = client
        .post(format!("{base}/jobs"))
        .json(&json!({ "message": "doctor1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let resp = client.get(format!("{base}/jobs/alice")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "doctor1");
    assert!(body["published"].is_string());

    let resp = client.get(format!("{base}/jobs/alice")).send().await.unwrap();
    assert_eq!(resp.status(), 204);
}

#[tokio::test]
async fn message_body_decodes_as_message() {
    let base = start_server(Broker::with_shard_count(10, 2)).await;
    let client = reqwest::Client::new();

    client.post(format!("{base}/t/s")).send().await.unwrap();
    client
        .post(format!("{base}/t"))
        .json(&json!({ "Message": "legacy key" }))
        .send()
        .await
        .unwrap();

    let msg: Message = client
        .get(format!("{base}/t/s"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(msg.payload, "legacy key");
}

#[tokio::test]
async fn get_unknown_topic_or_subscriber_is_404() {
    let base = start_server(Broker::with_shard_count(10, 2)).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/nope/anyone")).send().await.unwrap();
    assert_eq!(resp.status(), 404);

    client.post(format!("{base}/real/alice")).send().await.unwrap();
    let resp = client.get(format!("{base}/real/bob")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn unsubscribe_returns_204_and_removes_subscriber() {
    let base = start_server(Broker::with_shard_count(10, 2)).await;
    let client = reqwest::Client::new();

    client.post(format!("{base}/t/alice")).send().await.unwrap();
    let resp = client.delete(format!("{base}/t/alice")).send().await.unwrap();
    assert_eq!(resp.status(), 204);

    let resp = client.get(format!("{base}/t/alice")).send().await.unwrap();
    assert_eq!(resp.status(), 404);

    // unknown subscription: still 204
    let resp = client.delete(format!("{base}/t/ghost")).send().await.unwrap();
    assert_eq!(resp.status(), 204);
}

#[tokio::test]
async fn publish_rejects_non_json_body() {
    let base = start_server(Broker::with_shard_count(10, 2)).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/t"))
        .header("content-type", "text/plain")
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(format!("{base}/t"))
        .header("content-type", "application/json")
        .body("{ broken")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(format!("{base}/t"))
        .json(&json!({ "payload": "wrong field" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn full_mailbox_drops_over_http() {
    let base = start_server(Broker::with_shard_count(2, 2)).await;
    let client = reqwest::Client::new();

    client.post(format!("{base}/t/s")).send().await.unwrap();
    for i in 0..3 {
        let resp = client
            .post(format!("{base}/t"))
            .json(&json!({ "message": format!("m{i}") }))
            .send()
            .await
            .unwrap();
        // publish never fails, even when the message is dropped
        assert_eq!(resp.status(), 204);
    }

    for expected in ["m0", "m1"] {
        let msg: Message = client
            .get(format!("{base}/t/s"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(msg.payload, expected);
    }
    let resp = client.get(format!("{base}/t/s")).send().await.unwrap();
    assert_eq!(resp.status(), 204);
}

#[tokio::test]
async fn serve_stops_on_shutdown_signal() {
    let broker = Arc::new(Broker::with_shard_count(10, 2));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(http::serve(broker.clone(), listener, async move {
        let _ = rx.await;
    }));
    tx.send(()).unwrap();

    tokio::time::timeout(std::time::Duration::from_secs(5), server)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();

    if let Ok(broker) = Arc::try_unwrap(broker) {
        broker.close().await;
    }
}
