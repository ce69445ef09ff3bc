//! Ledger Adapters
//!
//! Versioned key-value ledgers with MVCC transactions.

mod memory;
mod transaction;

#[cfg(feature = "file-ledger")]
mod file;
#[cfg(feature = "file-ledger")]
mod lock;

pub use memory::InMemoryLedger;
pub use transaction::LedgerTransaction;

#[cfg(feature = "file-ledger")]
pub use file::FileLedger;
#[cfg(feature = "file-ledger")]
pub use lock::LedgerLock;
