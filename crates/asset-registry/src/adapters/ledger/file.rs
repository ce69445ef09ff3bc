use crate::adapters::ledger::lock::{io_error, LedgerLock};
use crate::adapters::ledger::memory::{InMemoryLedger, LedgerState};
use crate::adapters::ledger::transaction::LedgerTransaction;
use crate::domain::errors::StoreError;
use crate::ports::outbound::{CommitReceipt, TransactionalLedger};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File-backed ledger for single-node use.
///
/// Keeps the committed state in memory and rewrites a bincode snapshot for
/// every commit that writes. A commit becomes visible only once its snapshot
/// is on disk. The data directory is locked for the lifetime of the ledger.
#[derive(Debug)]
pub struct FileLedger {
    ledger: InMemoryLedger,
    snapshot_path: PathBuf,
    _lock: LedgerLock,
}

impl FileLedger {
    const SNAPSHOT_FILE: &'static str = "ledger.bin";

    /// Open (or create) the ledger stored in `data_dir`.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir).map_err(io_error)?;
        let lock = LedgerLock::acquire(data_dir)?;

        let snapshot_path = data_dir.join(Self::SNAPSHOT_FILE);
        let state = Self::load_snapshot(&snapshot_path)?;
        info!(
            path = %snapshot_path.display(),
            height = state.height(),
            keys = state.len(),
            "opened file ledger"
        );

        Ok(Self {
            ledger: InMemoryLedger::from_state(state),
            snapshot_path,
            _lock: lock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn height(&self) -> u64 {
        self.ledger.height()
    }

    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    fn load_snapshot(path: &Path) -> Result<LedgerState, StoreError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LedgerState::default())
            }
            Err(err) => return Err(io_error(err)),
        };
        bincode::deserialize(&bytes).map_err(|e| StoreError::Corrupted {
            message: format!("{}: {e}", path.display()),
        })
    }

    /// Write `state` via a temp file and rename.
    fn write_snapshot(&self, state: &LedgerState) -> Result<(), StoreError> {
        let bytes = bincode::serialize(state).map_err(|e| StoreError::Io {
            message: e.to_string(),
        })?;

        let temp_path = self.snapshot_path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;
        std::fs::rename(&temp_path, &self.snapshot_path).map_err(io_error)?;

        debug!(bytes = bytes.len(), "ledger snapshot written");
        Ok(())
    }
}

impl TransactionalLedger for FileLedger {
    type Transaction = LedgerTransaction;

    fn begin(&self) -> LedgerTransaction {
        self.ledger.begin()
    }

    fn commit(&self, tx: LedgerTransaction) -> Result<CommitReceipt, StoreError> {
        let tx_id = tx.id();
        let mut state = self.ledger.shared_state().write();
        let writes = tx.validated_writes(&state)?;
        if writes.is_empty() {
            return Ok(CommitReceipt {
                height: state.height(),
                writes: 0,
            });
        }

        // The live state is replaced only once the snapshot is durable.
        let mut next = state.clone();
        let writes = next.apply(writes);
        if let Err(err) = self.write_snapshot(&next) {
            warn!(tx_id = %tx_id, error = %err, "snapshot failed, commit discarded");
            return Err(err);
        }
        *state = next;

        let height = state.height();
        debug!(tx_id = %tx_id, height, writes, "transaction committed");
        Ok(CommitReceipt { height, writes })
    }
}
