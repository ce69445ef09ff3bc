use crate::adapters::ledger::memory::LedgerState;
use crate::domain::errors::StoreError;
use crate::ports::outbound::{
    encode_composite_key, BatchOperation, CommitReceipt, ScanIter, StateStore,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Keys and ranges observed by a transaction.
#[derive(Debug, Default)]
struct ReadSet {
    /// Version of each key at first read; 0 for absent keys.
    keys: HashMap<Vec<u8>, u64>,
    ranges: Vec<RangeRead>,
}

/// A scan, with the keys it returned.
#[derive(Debug)]
struct RangeRead {
    prefix: Vec<u8>,
    keys: Vec<Vec<u8>>,
}

/// One isolated unit of work against a ledger.
///
/// Writes are buffered until [`commit`](Self::commit) and are visible to
/// this transaction's own `get` calls. Scans see committed state only.
/// Commit fails with [`StoreError::Conflict`] if any key or range read by
/// the transaction changed since it was read. Dropping the transaction
/// discards it.
#[derive(Debug)]
pub struct LedgerTransaction {
    id: Uuid,
    state: Arc<RwLock<LedgerState>>,
    start_height: u64,
    reads: Mutex<ReadSet>,
    writes: Vec<BatchOperation>,
}

impl LedgerTransaction {
    pub(crate) fn new(state: Arc<RwLock<LedgerState>>) -> Self {
        let start_height = state.read().height();
        Self {
            id: Uuid::new_v4(),
            state,
            start_height,
            reads: Mutex::new(ReadSet::default()),
            writes: Vec::new(),
        }
    }

    /// Transaction id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Ledger height the transaction started at.
    pub fn start_height(&self) -> u64 {
        self.start_height
    }

    /// Writes staged so far, in order.
    pub fn staged_writes(&self) -> &[BatchOperation] {
        &self.writes
    }

    /// Validate reads, then apply staged writes as one commit.
    pub fn commit(self) -> Result<CommitReceipt, StoreError> {
        let shared = Arc::clone(&self.state);
        let mut state = shared.write();
        let id = self.id;

        let writes = self.validated_writes(&state)?;
        let writes = state.apply(writes);
        let height = state.height();
        debug!(tx_id = %id, height, writes, "transaction committed");
        Ok(CommitReceipt { height, writes })
    }

    /// Check the read set against `state` and hand back the staged writes.
    ///
    /// The caller must hold the ledger's write lock from this check until
    /// the writes are applied.
    pub(crate) fn validated_writes(
        self,
        state: &LedgerState,
    ) -> Result<Vec<BatchOperation>, StoreError> {
        let reads = self.reads.into_inner();

        for (key, read) in &reads.keys {
            let committed = state.version(key);
            if committed != *read {
                warn!(tx_id = %self.id, key = %display_key(key), read, committed, "read conflict");
                return Err(StoreError::Conflict {
                    key: display_key(key),
                    read: *read,
                    committed,
                });
            }
        }

        for range in &reads.ranges {
            let current: Vec<_> = state
                .scan_prefix(&range.prefix)
                .into_iter()
                .map(|(key, _, _)| key)
                .collect();
            if current != range.keys {
                warn!(tx_id = %self.id, prefix = %display_key(&range.prefix), "phantom read");
                return Err(StoreError::Conflict {
                    key: display_key(&range.prefix),
                    read: self.start_height,
                    committed: state.height(),
                });
            }
        }

        Ok(self.writes)
    }

    /// Discard the transaction.
    pub fn abort(self) {
        debug!(tx_id = %self.id, staged = self.writes.len(), "transaction aborted");
    }

    fn staged(&self, key: &[u8]) -> Option<&BatchOperation> {
        self.writes.iter().rev().find(|op| op.key() == key)
    }
}

impl StateStore for LedgerTransaction {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(op) = self.staged(key) {
            return Ok(match op {
                BatchOperation::Put { value, .. } => Some(value.clone()),
                BatchOperation::Delete { .. } => None,
            });
        }
        let state = self.state.read();
        self.reads
            .lock()
            .keys
            .entry(key.to_vec())
            .or_insert_with(|| state.version(key));
        Ok(state.value(key))
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.writes.push(BatchOperation::put(key, value));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.writes.push(BatchOperation::delete(key));
        Ok(())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), StoreError> {
        self.writes.extend(operations);
        Ok(())
    }

    fn scan_by_composite_prefix(
        &self,
        namespace: &str,
        prefix: &[&str],
    ) -> Result<ScanIter<'_>, StoreError> {
        let prefix = encode_composite_key(namespace, prefix)?;
        let rows = self.state.read().scan_prefix(&prefix);

        let mut reads = self.reads.lock();
        for (key, _, version) in &rows {
            reads.keys.entry(key.clone()).or_insert(*version);
        }
        reads.ranges.push(RangeRead {
            prefix,
            keys: rows.iter().map(|(key, _, _)| key.clone()).collect(),
        });

        Ok(Box::new(
            rows.into_iter().map(|(key, value, _)| Ok((key, value))),
        ))
    }
}

fn display_key(key: &[u8]) -> String {
    key.escape_ascii().to_string()
}
