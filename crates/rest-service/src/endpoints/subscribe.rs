//! Registers an address whose transactions should be collected from now on.
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse as _, Response};
use axum::routing::{post, MethodRouter};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::ServiceState;

pub(crate) const PATH: &str = "/subscribe";
pub(crate) fn handlers() -> MethodRouter<ServiceState> {
    post(post_handler)
}

#[derive(Debug, Deserialize)]
struct SubscribeRequest {
    address: String,
}

#[derive(Debug, Serialize)]
struct SubscribeResponse {
    subscribed: bool,
}

async fn post_handler(
    State(parser): State<ServiceState>,
    body: Bytes,
) -> Response {
    // the body is decoded whatever content type the client declared
    let Ok(request) = serde_json::from_slice::<SubscribeRequest>(&body) else {
        return (StatusCode::BAD_REQUEST, "Invalid request payload").into_response();
    };
    let subscribed = parser.subscribe(&request.address).await;
    Json(SubscribeResponse { subscribed }).into_response()
}
