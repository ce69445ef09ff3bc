//! # Asset Registry
//!
//! Asset ownership registry with an append-only provenance trail, kept in a
//! versioned key-value ledger.
//!
//! ## Data Model
//!
//! | Key | Value |
//! |-----|-------|
//! | `user_<id>` | `User` JSON: `{"name","id","asserts"}` |
//! | `asset_<id>` | `Asset` JSON: `{"name","id","metadata"}` |
//! | `history` composite `[assetId, originOwnerId, currentOwnerId]` | `AssetHistory` JSON |
//!
//! Ownership lives only in each user's `asserts` list. An enrollment is
//! recorded with the origin placeholder (`originOwnerPlaceholder` by
//! default) as its origin owner.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - keys, records, errors, configuration
//! - `ports/` - `AssetRegistryApi` (inbound), `StateStore` and
//!   `TransactionalLedger` (outbound)
//! - `adapters/` - in-memory and file-backed reference ledgers
//! - `service/` - `RegistryService`, the registry operations
//! - `dispatch` - name-based routing with uniform responses
//!
//! ## Usage
//!
//! ```ignore
//! use asset_registry::prelude::*;
//!
//! let ledger = InMemoryLedger::new();
//! let dispatcher = Dispatcher::new(RegistryService::new(RegistryConfig::default())?);
//!
//! let args = vec!["alice".to_string(), "u1".to_string()];
//! let response = dispatcher.invoke_in_transaction(&ledger, "userRegister", &args);
//! assert!(response.is_success());
//! ```

#![warn(clippy::all)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod dispatch;
pub mod domain;
pub mod ports;
pub mod service;

/// Test fixtures (seeded service, fault-injecting store).
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::config::{ConfigError, EnrollScan, RegistryConfig};
    pub use crate::domain::entities::{Asset, AssetHistory, HistoryQuery, User};
    pub use crate::domain::errors::{RecordKind, RegistryError, StoreError};

    // Ports
    pub use crate::ports::inbound::AssetRegistryApi;
    pub use crate::ports::outbound::{
        BatchOperation, CommitReceipt, StateStore, TransactionalLedger,
    };

    // Adapters
    #[cfg(feature = "file-ledger")]
    pub use crate::adapters::FileLedger;
    pub use crate::adapters::{InMemoryLedger, LedgerTransaction};

    // Service and dispatch
    pub use crate::dispatch::{Dispatcher, Operation, Response};
    pub use crate::service::RegistryService;
}

pub use dispatch::{Dispatcher, Operation, Response};
pub use domain::errors::{RegistryError, StoreError};
pub use service::RegistryService;

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
