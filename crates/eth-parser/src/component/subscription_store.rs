use std::collections::HashMap;

use super::dedup_index::DedupIndex;
use crate::types::{normalize_address, DedupKey, Transaction};

/// Subscribed addresses and their append-only transaction logs.
///
/// Callers must hold the parser's state lock; nothing in here is synchronised on its own.
#[derive(Debug, Default)]
pub(crate) struct SubscriptionStore {
    logs: HashMap<String, Vec<Transaction>>,
    dedup: DedupIndex,
}

impl SubscriptionStore {
    /// Returns `true` if the address was not subscribed before.
    pub(crate) fn subscribe(&mut self, address: &str) -> bool {
        let address = normalize_address(address);
        if self.logs.contains_key(&address) {
            return false;
        }
        self.logs.insert(address, Vec::new());
        true
    }

    /// Append `tx` to the log of `address` unless the address is not subscribed or `key` was
    /// already recorded for it. Returns whether the log grew.
    pub(crate) fn record_if_new(&mut self, address: &str, tx: &Transaction, key: DedupKey) -> bool {
        let address = normalize_address(address);
        let Some(log) = self.logs.get_mut(&address) else {
            return false;
        };
        if self.dedup.has_seen(&address, key) {
            return false;
        }
        log.push(tx.clone());
        self.dedup.mark_seen(&address, key);
        true
    }

    /// Route every transaction of a block to its sender and receiver.
    ///
    /// Returns the number of log entries appended.
    pub(crate) fn record_block(&mut self, transactions: &[Transaction]) -> usize {
        let mut recorded = 0;
        for tx in transactions {
            let key = tx.dedup_key();
            let targets = core::iter::once(tx.from.as_str()).chain(tx.to.as_deref());
            for address in targets {
                if self.record_if_new(address, tx, key) {
                    recorded += 1;
                }
            }
        }
        recorded
    }

    /// Snapshot of the log of `address`; empty if it is not subscribed.
    pub(crate) fn transactions_for(&self, address: &str) -> Vec<Transaction> {
        self.logs
            .get(&normalize_address(address))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn subscription_count(&self) -> usize {
        self.logs.len()
    }
}
