//! HTTP transport: maps REST-style routes onto broker operations.
//!
//! ## Routes
//!
//! - `POST /:topic` — publish `{"message": "..."}`. 204, or 400 on a bad body.
//! - `POST /:topic/:subscriber` — subscribe. 201.
//! - `DELETE /:topic/:subscriber` — unsubscribe. 204.
//! - `GET /:topic/:subscriber` — pull the next message. 200 with the message
//!   as JSON, 204 when the mailbox is empty, 404 when the topic or
//!   subscriber is unknown.

use std::future::Future;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::broker::{Broker, Message};
use crate::transport::message::PublishRequest;
use crate::utils::error::BrokerError;

/// Build an axum `Router` serving the given broker.
pub fn router(broker: Arc<Broker>) -> Router {
    Router::new()
        .route("/:topic", post(publish))
        .route(
            "/:topic/:subscriber",
            post(subscribe).delete(unsubscribe).get(get_message),
        )
        .with_state(broker)
}

/// Serve the broker over HTTP on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    broker: Arc<Broker>,
    listener: TcpListener,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("HTTP server listening on http://{addr}");
    }
    axum::serve(listener, router(broker))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn publish(
    State(broker): State<Arc<Broker>>,
    Path(topic): Path<String>,
    body: Result<Json<PublishRequest>, JsonRejection>,
) -> StatusCode {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(topic = %topic, error = %rejection, "rejected publish body");
            return StatusCode::BAD_REQUEST;
        }
    };

    debug!(topic = %topic, "publish");
    broker.publish(topic, Message::new(request.message)).await;
    StatusCode::NO_CONTENT
}

async fn subscribe(
    State(broker): State<Arc<Broker>>,
    Path((topic, subscriber)): Path<(String, String)>,
) -> StatusCode {
    debug!(topic = %topic, subscriber = %subscriber, "subscribe");
    broker.subscribe(topic, subscriber).await;
    StatusCode::CREATED
}

async fn unsubscribe(
    State(broker): State<Arc<Broker>>,
    Path((topic, subscriber)): Path<(String, String)>,
) -> StatusCode {
    debug!(topic = %topic, subscriber = %subscriber, "unsubscribe");
    broker.unsubscribe(topic, subscriber).await;
    StatusCode::NO_CONTENT
}

async fn get_message(
    State(broker): State<Arc<Broker>>,
    Path((topic, subscriber)): Path<(String, String)>,
) -> Response {
    match broker.get(topic, subscriber).await {
        Ok(msg) => (StatusCode::OK, Json(msg)).into_response(),
        Err(e) => status_for(e).into_response(),
    }
}

/// Status code reported for a failed `Get`.
pub fn status_for(err: BrokerError) -> StatusCode {
    match err {
        BrokerError::TopicNotFound | BrokerError::SubscriberNotFound => StatusCode::NOT_FOUND,
        BrokerError::NoNewMessages => StatusCode::NO_CONTENT,
        BrokerError::ShardClosed => StatusCode::SERVICE_UNAVAILABLE,
    }
}
