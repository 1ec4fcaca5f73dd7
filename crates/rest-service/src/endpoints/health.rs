//! Health endpoint, returns 200 OK if the service is up and running.
use axum::routing::{get, MethodRouter};

pub(crate) const PATH: &str = "/health";
pub(crate) fn handlers<S>() -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    get(get_handler)
}

async fn get_handler() {}
