use crate::adapters::ledger::transaction::LedgerTransaction;
use crate::domain::errors::StoreError;
use crate::ports::outbound::{
    encode_composite_key, BatchOperation, CommitReceipt, ScanIter, StateStore,
    TransactionalLedger,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Committed value with its bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct VersionedValue {
    pub(crate) value: Vec<u8>,
    /// Height of the commit that last wrote the key.
    pub(crate) version: u64,
    /// Order of the key's first write. Scans return entries in this order.
    pub(crate) seq: u64,
}

/// Committed world state shared by a ledger and its open transactions.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct LedgerState {
    entries: BTreeMap<Vec<u8>, VersionedValue>,
    height: u64,
    next_seq: u64,
}

impl LedgerState {
    pub(crate) fn height(&self) -> u64 {
        self.height
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn value(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Version of a key; 0 when absent.
    pub(crate) fn version(&self, key: &[u8]) -> u64 {
        self.entries.get(key).map_or(0, |entry| entry.version)
    }

    /// `(key, value, version)` of every key starting with `prefix`, in
    /// first-write order.
    pub(crate) fn scan_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>, u64)> {
        let mut rows: Vec<_> = self
            .entries
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .collect();
        rows.sort_by_key(|(_, entry)| entry.seq);
        rows.into_iter()
            .map(|(key, entry)| (key.clone(), entry.value.clone(), entry.version))
            .collect()
    }

    /// Apply a batch as one commit. Empty batches leave the height unchanged.
    pub(crate) fn apply(&mut self, operations: Vec<BatchOperation>) -> usize {
        if operations.is_empty() {
            return 0;
        }
        self.height += 1;
        let writes = operations.len();
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => match self.entries.get_mut(&key) {
                    Some(entry) => {
                        entry.value = value;
                        entry.version = self.height;
                    }
                    None => {
                        let seq = self.next_seq;
                        self.next_seq += 1;
                        self.entries.insert(
                            key,
                            VersionedValue {
                                value,
                                version: self.height,
                                seq,
                            },
                        );
                    }
                },
                BatchOperation::Delete { key } => {
                    self.entries.remove(&key);
                }
            }
        }
        writes
    }
}

/// In-memory versioned ledger.
///
/// Clones share the same state. Used directly as a [`StateStore`] every
/// write commits immediately; use [`InMemoryLedger::begin`] for isolated
/// transactions with read-set validation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_state(state: LedgerState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub(crate) fn shared_state(&self) -> &Arc<RwLock<LedgerState>> {
        &self.state
    }

    /// Number of non-empty commits applied so far.
    pub fn height(&self) -> u64 {
        self.state.read().height()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.state.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Open a transaction against the current committed state.
    pub fn begin(&self) -> LedgerTransaction {
        LedgerTransaction::new(Arc::clone(&self.state))
    }
}

impl StateStore for InMemoryLedger {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.state.read().value(key))
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.state
            .write()
            .apply(vec![BatchOperation::put(key, value)]);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.state.write().apply(vec![BatchOperation::delete(key)]);
        Ok(())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), StoreError> {
        self.state.write().apply(operations);
        Ok(())
    }

    fn scan_by_composite_prefix(
        &self,
        namespace: &str,
        prefix: &[&str],
    ) -> Result<ScanIter<'_>, StoreError> {
        let prefix = encode_composite_key(namespace, prefix)?;
        let rows = self.state.read().scan_prefix(&prefix);
        Ok(Box::new(
            rows.into_iter().map(|(key, value, _)| Ok((key, value))),
        ))
    }
}

impl TransactionalLedger for InMemoryLedger {
    type Transaction = LedgerTransaction;

    fn begin(&self) -> LedgerTransaction {
        InMemoryLedger::begin(self)
    }

    fn commit(&self, tx: LedgerTransaction) -> Result<CommitReceipt, StoreError> {
        tx.commit()
    }
}
