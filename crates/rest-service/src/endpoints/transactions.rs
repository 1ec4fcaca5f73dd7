//! Returns the transactions collected so far for one address.
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse as _, Response};
use axum::routing::{get, MethodRouter};
use axum::Json;
use serde::Deserialize;

use crate::ServiceState;

pub(crate) const PATH: &str = "/transactions";
pub(crate) fn handlers() -> MethodRouter<ServiceState> {
    get(get_handler)
}

#[derive(Debug, Deserialize)]
struct TransactionsQuery {
    #[serde(default)]
    address: Option<String>,
}

async fn get_handler(
    State(parser): State<ServiceState>,
    Query(query): Query<TransactionsQuery>,
) -> Response {
    let Some(address) = query.address.filter(|address| !address.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Address parameter is required").into_response();
    };
    tracing::debug!(%address, "listing transactions");

    let transactions = parser.transactions_for(&address).await;
    Json(transactions).into_response()
}
