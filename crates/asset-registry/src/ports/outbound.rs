//! # Outbound Ports (Driven Ports)
//!
//! The state-access contract the registry consumes. The ledger runtime that
//! hosts the registry implements [`StateStore`] once per transaction.
//!
//! Reference implementations: `InMemoryLedger` / `LedgerTransaction` and
//! `FileLedger` (adapters/ledger).

use crate::domain::errors::StoreError;

/// One `(key, value)` pair returned by a scan.
pub type KeyValue = (Vec<u8>, Vec<u8>);

/// Ordered scan results. Dropping the iterator closes the scan.
pub type ScanIter<'a> = Box<dyn Iterator<Item = Result<KeyValue, StoreError>> + 'a>;

/// Separator byte of the composite key encoding.
pub const COMPOSITE_KEY_DELIMITER: u8 = 0x00;

/// Transaction-scoped view of the versioned key-value ledger.
///
/// ## Contract
///
/// - An absent key and a key holding an empty value are equivalent.
/// - `atomic_batch_write` applies ALL operations or NONE.
/// - Scans over a composite prefix match whole components only and return
///   entries in store-defined order.
/// - Every failure is reported as a [`StoreError`]; the registry never
///   masks one.
pub trait StateStore: Send {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Put a single key-value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Delete a key.
    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError>;

    /// Execute an atomic batch write.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), StoreError>;

    /// Encode a composite key.
    fn composite_key(&self, namespace: &str, components: &[&str]) -> Result<Vec<u8>, StoreError> {
        encode_composite_key(namespace, components)
    }

    /// Iterate over composite keys of `namespace` whose leading components
    /// equal `prefix`.
    fn scan_by_composite_prefix(
        &self,
        namespace: &str,
        prefix: &[&str],
    ) -> Result<ScanIter<'_>, StoreError>;

    /// Check if a key holds a non-empty value.
    fn exists(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some_and(|value| !value.is_empty()))
    }
}

/// Outcome of a successful ledger commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitReceipt {
    /// Ledger height after the commit. Read-only commits leave it unchanged.
    pub height: u64,
    /// Number of key writes applied.
    pub writes: usize,
}

/// A ledger that hands out isolated transactions.
///
/// Writes staged on a transaction become visible to other transactions only
/// after `commit`. Dropping a transaction without committing discards it.
pub trait TransactionalLedger: Send + Sync {
    /// Per-transaction state store handle.
    type Transaction: StateStore;

    /// Open a new transaction against the current committed state.
    fn begin(&self) -> Self::Transaction;

    /// Validate the transaction's reads and apply its writes atomically.
    fn commit(&self, tx: Self::Transaction) -> Result<CommitReceipt, StoreError>;
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put { key: Vec<u8>, value: Vec<u8> },
    /// Delete a key.
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }

    /// Key touched by this operation.
    pub fn key(&self) -> &[u8] {
        match self {
            BatchOperation::Put { key, .. } | BatchOperation::Delete { key } => key,
        }
    }
}

/// Default composite key encoding:
/// `0x00 namespace 0x00 component 0x00 component 0x00 ...`.
///
/// Encoding a leading subset of the components yields the scan prefix for
/// that subset, so `["a1"]` never matches keys whose first component is
/// `"a10"`.
pub fn encode_composite_key(namespace: &str, components: &[&str]) -> Result<Vec<u8>, StoreError> {
    validate_key_part(namespace, "namespace")?;
    let mut key = Vec::with_capacity(
        2 + namespace.len() + components.iter().map(|c| c.len() + 1).sum::<usize>(),
    );
    key.push(COMPOSITE_KEY_DELIMITER);
    key.extend_from_slice(namespace.as_bytes());
    key.push(COMPOSITE_KEY_DELIMITER);
    for component in components {
        validate_key_part(component, "component")?;
        key.extend_from_slice(component.as_bytes());
        key.push(COMPOSITE_KEY_DELIMITER);
    }
    Ok(key)
}

/// Split an encoded composite key back into namespace and components.
pub fn split_composite_key(key: &[u8]) -> Result<(String, Vec<String>), StoreError> {
    let corrupted = || StoreError::InvalidCompositeKey {
        reason: "not a composite key".to_string(),
    };
    let body = key
        .strip_prefix(&[COMPOSITE_KEY_DELIMITER])
        .and_then(|rest| rest.strip_suffix(&[COMPOSITE_KEY_DELIMITER]))
        .ok_or_else(corrupted)?;

    let mut parts = body
        .split(|b| *b == COMPOSITE_KEY_DELIMITER)
        .map(|part| String::from_utf8(part.to_vec()).map_err(|_| corrupted()));
    let namespace = parts.next().ok_or_else(corrupted)??;
    let components = parts.collect::<Result<Vec<_>, _>>()?;
    Ok((namespace, components))
}

fn validate_key_part(part: &str, what: &str) -> Result<(), StoreError> {
    if part.as_bytes().contains(&COMPOSITE_KEY_DELIMITER) {
        return Err(StoreError::InvalidCompositeKey {
            reason: format!("{what} {part:?} contains the 0x00 delimiter"),
        });
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
