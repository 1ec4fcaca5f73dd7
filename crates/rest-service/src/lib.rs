//! HTTP surface of the parser: head query, subscriptions and per-address transaction history.

mod component;
mod config;
mod endpoints;

pub use component::RestService;
pub use config::Config;

/// State shared by every handler.
pub(crate) type ServiceState = std::sync::Arc<eth_parser::Parser>;
