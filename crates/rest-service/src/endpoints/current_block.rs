//! Refreshes the head from the node and returns it as a hex quantity.
use axum::extract::State;
use axum::routing::{get, MethodRouter};
use axum::Json;
use serde::Serialize;

use crate::ServiceState;

pub(crate) const PATH: &str = "/current_block";
pub(crate) fn handlers() -> MethodRouter<ServiceState> {
    get(get_handler)
}

#[derive(Debug, Serialize)]
struct CurrentBlockResponse {
    current_block: String,
}

async fn get_handler(State(parser): State<ServiceState>) -> Json<CurrentBlockResponse> {
    let current_block = parser.current_block_hex().await;
    Json(CurrentBlockResponse { current_block })
}
