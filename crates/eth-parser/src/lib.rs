//! Ethereum address activity parser
//!
//! Polls a chain node over JSON-RPC and keeps, for every subscribed address, the list of
//! transactions sent from or to it since the subscription was made.

mod component;
mod config;
pub mod quantity;
mod rpc;
mod types;

/// Re-export the public API
pub use component::{BlockScanner, CycleOutcome, Parser};
pub use config::Config;
pub use rpc::{ChainRpc, HttpRpcClient, RpcError};
pub use types::{Block, DedupKey, Transaction};
