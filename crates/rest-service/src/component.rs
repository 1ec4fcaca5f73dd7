//! REST service component exposing the parser over HTTP.
use core::net::SocketAddr;
use core::time::Duration;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use eth_parser::Parser;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::{endpoints, Config};

/// The REST service component.
#[derive(Debug)]
pub struct RestService {
    router: Router,
    socket_addr: SocketAddr,
    shutdown_tx: tokio::sync::mpsc::Sender<Result<(), eyre::Error>>,
    shutdown_rx: tokio::sync::mpsc::Receiver<Result<(), eyre::Error>>,
}

impl RestService {
    /// Create a new REST service component serving `parser`.
    #[must_use]
    pub fn new(config: &Config, parser: Arc<Parser>) -> Self {
        let (shutdown_tx, shutdown_rx) = tokio::sync::mpsc::channel(1);
        let router = Router::new()
            .route(endpoints::health::PATH, endpoints::health::handlers())
            .route(
                endpoints::current_block::PATH,
                endpoints::current_block::handlers(),
            )
            .route(endpoints::subscribe::PATH, endpoints::subscribe::handlers())
            .route(
                endpoints::transactions::PATH,
                endpoints::transactions::handlers(),
            )
            .layer(ConcurrencyLimitLayer::new(config.max_concurrent_http_requests))
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!("", method = %req.method(), uri = %req.uri())
            }).on_response(|res: &Response<Body>, latency: Duration, _span: &Span| {
                if res.status().is_server_error() {
                    tracing::error!(status = %res.status().as_u16(), latency = ?latency);
                } else if res.status().is_client_error() {
                    tracing::warn!(status = %res.status().as_u16(), latency = ?latency);
                } else {
                    tracing::info!(status = %res.status().as_u16(), latency = ?latency);
                }
            }).on_failure(()))
            .with_state(parser);

        Self {
            router,
            socket_addr: config.socket_addr(),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Returns the tx side of the channel used to shutdown the service.
    #[must_use]
    pub fn shutdown_sender(&self) -> tokio::sync::mpsc::Sender<Result<(), eyre::Error>> {
        self.shutdown_tx.clone()
    }

    /// Serve requests until a message arrives on the shutdown channel.
    ///
    /// # Errors
    ///
    /// If the socket cannot be bound or the server fails.
    pub async fn process(mut self) -> eyre::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.socket_addr).await?;
        tracing::info!("REST Service Listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                match self.shutdown_rx.recv().await {
                    Some(Ok(())) => {
                        tracing::info!("Shutting down REST service gracefully");
                    }
                    Some(Err(error)) => {
                        tracing::error!("Shutting down REST service due to error: {:?}", error);
                    }
                    None => {
                        tracing::warn!("Shutting down REST service due to channel close");
                    }
                }
            })
            .await?;

        Ok(())
    }
}
