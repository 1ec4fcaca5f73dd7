use core::time::Duration;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::quantity;
use crate::rpc::{ChainRpc, HttpRpcClient, RpcError};
use crate::types::Transaction;

mod block_scanner;
mod dedup_index;
mod subscription_store;

pub use block_scanner::{BlockScanner, CycleOutcome};
use subscription_store::SubscriptionStore;

/// Everything guarded by the parser's single lock.
#[derive(Debug, Default)]
pub(crate) struct ParserState {
    /// Head block as of the last successful head query; `0` until the first one.
    pub(crate) current_block: u64,
    pub(crate) subscriptions: SubscriptionStore,
}

/// Tracks the chain head and the transaction history of subscribed addresses.
///
/// Construct it once and share it behind an [`Arc`]; the REST surface calls the three query
/// operations while the [`BlockScanner`] built from it fills the logs in the background.
pub struct Parser {
    state: Arc<RwLock<ParserState>>,
    rpc: Arc<dyn ChainRpc>,
    poll_interval: Duration,
}

impl core::fmt::Debug for Parser {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Parser")
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl Parser {
    /// Create a parser talking to the node over HTTP.
    ///
    /// # Errors
    ///
    /// If the HTTP client cannot be built.
    pub fn new(config: &crate::Config) -> Result<Self, RpcError> {
        let rpc = HttpRpcClient::new(config.rpc_url.clone(), config.rpc_timeout)?;
        tracing::info!(rpc_url = %config.rpc_url, "created parser");
        Ok(Self::with_rpc(config, Arc::new(rpc)))
    }

    /// Create a parser on top of any [`ChainRpc`] implementation.
    #[must_use]
    pub fn with_rpc(config: &crate::Config, rpc: Arc<dyn ChainRpc>) -> Self {
        Self {
            state: Arc::new(RwLock::new(ParserState::default())),
            rpc,
            poll_interval: config.poll_interval,
        }
    }

    /// Refresh the head from the node and return it as a hex quantity.
    ///
    /// The refreshed head becomes the cursor the scanner starts from. When the node cannot be
    /// reached the previous value is returned instead of an error. The state lock is held for
    /// the whole round trip.
    #[tracing::instrument(skip_all)]
    pub async fn current_block_hex(&self) -> String {
        let mut state = self.state.write().await;
        match self.rpc.block_number().await {
            Ok(head) => state.current_block = head,
            Err(error) => {
                tracing::error!(
                    %error,
                    stale = state.current_block,
                    "failed to refresh head block, returning last known value"
                );
            }
        }
        quantity::to_hex(state.current_block)
    }

    /// Start tracking `address`. Returns `false` if it was already tracked.
    pub async fn subscribe(&self, address: &str) -> bool {
        let mut state = self.state.write().await;
        let created = state.subscriptions.subscribe(address);
        if created {
            tracing::info!(
                address,
                subscriptions = state.subscriptions.subscription_count(),
                "new subscription"
            );
        }
        created
    }

    /// Transactions recorded so far for `address`, in discovery order.
    pub async fn transactions_for(&self, address: &str) -> Vec<Transaction> {
        self.state.read().await.subscriptions.transactions_for(address)
    }

    /// Background component scanning blocks into this parser's state until `cancel` fires.
    #[must_use]
    pub fn block_scanner(&self, cancel: CancellationToken) -> BlockScanner {
        BlockScanner {
            state: Arc::clone(&self.state),
            rpc: Arc::clone(&self.rpc),
            poll_interval: self.poll_interval,
            cancel,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use super::*;

    /// In-memory node with switchable failures.
    #[derive(Debug, Default)]
    pub(crate) struct MockChain {
        inner: Mutex<MockChainInner>,
    }

    #[derive(Debug, Default)]
    struct MockChainInner {
        head: u64,
        head_fails: bool,
        blocks: HashMap<u64, Vec<Transaction>>,
        failing_blocks: HashSet<u64>,
        fetched: Vec<u64>,
    }

    impl MockChain {
        pub(crate) fn set_head(&self, head: u64) {
            self.inner.lock().unwrap().head = head;
        }

        pub(crate) fn fail_head(&self, fail: bool) {
            self.inner.lock().unwrap().head_fails = fail;
        }

        pub(crate) fn insert_block(&self, number: u64, transactions: Vec<Transaction>) {
            self.inner.lock().unwrap().blocks.insert(number, transactions);
        }

        pub(crate) fn fail_block(&self, number: u64) {
            self.inner.lock().unwrap().failing_blocks.insert(number);
        }

        pub(crate) fn fetched_blocks(&self) -> Vec<u64> {
            self.inner.lock().unwrap().fetched.clone()
        }
    }

    #[async_trait::async_trait]
    impl ChainRpc for MockChain {
        async fn block_number(&self) -> Result<u64, RpcError> {
            let inner = self.inner.lock().unwrap();
            if inner.head_fails {
                return Err(RpcError::Decode("injected head failure".to_owned()));
            }
            Ok(inner.head)
        }

        async fn block_transactions(
            &self,
            block_number: u64,
        ) -> Result<Vec<Transaction>, RpcError> {
            let mut inner = self.inner.lock().unwrap();
            inner.fetched.push(block_number);
            if inner.failing_blocks.contains(&block_number) {
                return Err(RpcError::Decode(format!("injected failure for {block_number}")));
            }
            Ok(inner.blocks.get(&block_number).cloned().unwrap_or_default())
        }
    }
}
