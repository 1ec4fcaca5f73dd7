use std::collections::{HashMap, HashSet};

use crate::types::DedupKey;

/// Per-address record of which transactions have already been logged.
///
/// Grows for the lifetime of the process; nothing is ever evicted.
#[derive(Debug, Default)]
pub(crate) struct DedupIndex {
    seen: HashMap<String, HashSet<DedupKey>>,
}

impl DedupIndex {
    pub(crate) fn has_seen(&self, address: &str, key: DedupKey) -> bool {
        self.seen
            .get(address)
            .is_some_and(|keys| keys.contains(&key))
    }

    /// Returns `true` if the key was not recorded before for this address.
    pub(crate) fn mark_seen(&mut self, address: &str, key: DedupKey) -> bool {
        self.seen.entry(address.to_owned()).or_default().insert(key)
    }
}
