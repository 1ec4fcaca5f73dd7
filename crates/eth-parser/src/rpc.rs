//! JSON-RPC access to the chain node.

use core::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::quantity::{self, ParseQuantityError};
use crate::types::{Block, Transaction};

/// Request id sent with every call. The node echoes it back; nothing matches on it.
const REQUEST_ID: u64 = 83;

/// Errors returned by [`ChainRpc`] implementations.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The node could not be reached, timed out or answered with a non-success status.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The response body is not the JSON-RPC envelope we expect.
    #[error("decode error: {0}")]
    Decode(String),
    /// A numeric field is not a valid quantity.
    #[error("parse error: {0}")]
    Parse(#[from] ParseQuantityError),
}

impl From<serde_json::Error> for RpcError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

/// The two node calls the parser needs.
#[async_trait::async_trait]
pub trait ChainRpc: Send + Sync + 'static {
    /// Current head block number (`eth_blockNumber`).
    async fn block_number(&self) -> Result<u64, RpcError>;

    /// Transactions of block `block_number` (`eth_getBlockByNumber` with full objects).
    ///
    /// A block the node has not produced yet yields an empty list.
    async fn block_transactions(&self, block_number: u64) -> Result<Vec<Transaction>, RpcError>;
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: serde_json::Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    #[serde(default = "Option::default")]
    result: Option<T>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

/// [`ChainRpc`] over HTTP POST.
#[derive(Debug, Clone)]
pub struct HttpRpcClient {
    client: reqwest::Client,
    url: Url,
}

impl HttpRpcClient {
    /// Create a client for `url`; every request is bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// If the underlying HTTP client cannot be built (TLS backend initialisation).
    pub fn new(url: Url, timeout: Duration) -> Result<Self, RpcError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    /// Send one call and return its `result`, `None` when the node answered `null`.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<T>, RpcError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: REQUEST_ID,
        };

        let body = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let response: JsonRpcResponse<T> = serde_json::from_slice(&body)?;
        if let Some(error) = response.error {
            return Err(RpcError::Decode(format!(
                "node returned error {} for {method}: {}",
                error.code, error.message
            )));
        }
        Ok(response.result)
    }
}

#[async_trait::async_trait]
impl ChainRpc for HttpRpcClient {
    #[tracing::instrument(skip_all, err)]
    async fn block_number(&self) -> Result<u64, RpcError> {
        let head = self
            .call::<String>("eth_blockNumber", serde_json::json!([]))
            .await?
            .ok_or_else(|| RpcError::Decode("eth_blockNumber returned no result".to_owned()))?;
        let head = quantity::from_hex(&head)?;
        tracing::debug!(head, "fetched head block number");
        Ok(head)
    }

    #[tracing::instrument(skip(self), err)]
    async fn block_transactions(&self, block_number: u64) -> Result<Vec<Transaction>, RpcError> {
        let params = serde_json::json!([quantity::to_hex(block_number), true]);
        let Some(block) = self
            .call::<Block>("eth_getBlockByNumber", params)
            .await?
        else {
            tracing::debug!("block not produced yet");
            return Ok(Vec::new());
        };
        tracing::debug!(
            transactions = block.transactions.len(),
            "fetched block"
        );
        Ok(block.transactions)
    }
}
