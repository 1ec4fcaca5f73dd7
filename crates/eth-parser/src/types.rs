use serde::{Deserialize, Serialize};

use crate::quantity::serde_quantity;

/// A transaction as returned by `eth_getBlockByNumber` with full transaction objects.
///
/// Only the fields the parser routes on are typed; everything else the node sends is kept in
/// [`Transaction::other`] so the record can be handed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction hash.
    pub hash: String,
    /// Sender address.
    pub from: String,
    /// Receiver address, `None` for contract creation.
    #[serde(default)]
    pub to: Option<String>,
    /// Height of the containing block.
    #[serde(with = "serde_quantity")]
    pub block_number: u64,
    /// Zero-based position inside the containing block.
    #[serde(with = "serde_quantity")]
    pub transaction_index: u64,
    /// Transferred value in wei, as the node's hex quantity.
    pub value: String,
    /// Remaining fields of the node's record.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl Transaction {
    /// Key identifying this transaction independently of the address looking at it.
    #[must_use]
    pub const fn dedup_key(&self) -> DedupKey {
        DedupKey {
            block_number: self.block_number,
            transaction_index: self.transaction_index,
        }
    }
}

/// A block with its transactions in on-chain order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Block {
    /// Block height.
    #[serde(with = "serde_quantity")]
    pub number: u64,
    /// Transactions of the block; absent means none.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// (block number, transaction index) pair used to record a transaction at most once per address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey {
    /// Height of the containing block.
    pub block_number: u64,
    /// Position inside the block.
    pub transaction_index: u64,
}

/// Canonical form of an address used as a map key.
pub(crate) fn normalize_address(address: &str) -> String {
    address.trim().to_ascii_lowercase()
}
