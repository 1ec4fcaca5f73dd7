use core::time::Duration;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use super::ParserState;
use crate::rpc::ChainRpc;

/// Result of one pass of the scanner, mostly useful for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The node did not report its head; nothing was scanned.
    HeadUnavailable,
    /// No head query has set the cursor yet; nothing was scanned.
    CursorUninitialized,
    /// The range `from..=to` was visited.
    Scanned {
        /// First block of the range (the cursor).
        from: u64,
        /// Last block of the range (the node's head).
        to: u64,
        /// Blocks fetched and routed.
        blocks_processed: u64,
        /// Blocks whose fetch failed and were left out.
        blocks_skipped: u64,
        /// Log entries appended across all subscribed addresses.
        transactions_recorded: usize,
    },
    /// Shutdown was requested in the middle of the range.
    Cancelled,
}

/// Background loop polling the node and routing new transactions to subscribed addresses.
///
/// Built by [`crate::Parser::block_scanner`]; shares the parser's state and RPC client.
pub struct BlockScanner {
    pub(crate) state: Arc<RwLock<ParserState>>,
    pub(crate) rpc: Arc<dyn ChainRpc>,
    pub(crate) poll_interval: Duration,
    pub(crate) cancel: CancellationToken,
}

impl core::fmt::Debug for BlockScanner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BlockScanner")
            .field("poll_interval", &self.poll_interval)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl BlockScanner {
    /// Run scan cycles until the cancellation token fires.
    ///
    /// Errors never stop the loop; they are logged and the cycle is retried after the poll
    /// interval.
    ///
    /// # Errors
    ///
    /// Currently none; fetch failures are retried on the next cycle.
    pub async fn process(self) -> eyre::Result<()> {
        tracing::info!(poll_interval = ?self.poll_interval, "starting block scanner");

        loop {
            match self.scan_cycle().await {
                CycleOutcome::Cancelled => break,
                CycleOutcome::Scanned {
                    from,
                    to,
                    blocks_processed,
                    blocks_skipped,
                    transactions_recorded,
                } => {
                    tracing::info!(
                        from,
                        to,
                        blocks_processed,
                        blocks_skipped,
                        transactions_recorded,
                        "scan cycle finished"
                    );
                }
                CycleOutcome::CursorUninitialized => {
                    tracing::debug!("head not queried yet, nothing to scan");
                }
                CycleOutcome::HeadUnavailable => {}
            }

            tokio::select! {
                () = self.cancel.cancelled() => break,
                () = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        tracing::info!("block scanner stopped");
        Ok(())
    }

    /// Visit every block from the shared cursor up to the node's head once.
    ///
    /// The cursor itself is only read here. It moves when
    /// [`crate::Parser::current_block_hex`] is called.
    #[tracing::instrument(skip_all)]
    pub async fn scan_cycle(&self) -> CycleOutcome {
        let start_block = self.state.read().await.current_block;

        let last_block_number = match self.rpc.block_number().await {
            Ok(head) => head,
            Err(error) => {
                tracing::error!(%error, "failed to fetch head block number");
                return CycleOutcome::HeadUnavailable;
            }
        };

        if start_block == 0 {
            return CycleOutcome::CursorUninitialized;
        }

        let mut blocks_processed = 0_u64;
        let mut blocks_skipped = 0_u64;
        let mut transactions_recorded = 0_usize;

        for block_number in start_block..=last_block_number {
            if self.cancel.is_cancelled() {
                return CycleOutcome::Cancelled;
            }

            let transactions = match self.rpc.block_transactions(block_number).await {
                Ok(transactions) => transactions,
                Err(error) => {
                    tracing::warn!(block_number, %error, "skipping block");
                    blocks_skipped = blocks_skipped.saturating_add(1);
                    continue;
                }
            };

            let recorded = self
                .state
                .write()
                .await
                .subscriptions
                .record_block(&transactions);
            if recorded > 0 {
                tracing::debug!(block_number, recorded, "recorded transactions");
            }
            transactions_recorded = transactions_recorded.saturating_add(recorded);
            blocks_processed = blocks_processed.saturating_add(1);
        }

        CycleOutcome::Scanned {
            from: start_block,
            to: last_block_number,
            blocks_processed,
            blocks_skipped,
            transactions_recorded,
        }
    }
}
