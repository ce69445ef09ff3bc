//! # Operation Dispatcher
//!
//! Routes an operation name and its positional arguments to the registry
//! service and turns the outcome into a uniform [`Response`].
//!
//! The routing table is built once and is read-only afterwards. Names are
//! case-sensitive; anything not in the table fails `UNSUPPORTED_OPERATION`.

use crate::domain::errors::RegistryError;
use crate::ports::outbound::{StateStore, TransactionalLedger};
use crate::service::RegistryService;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};

// =============================================================================
// OPERATIONS
// =============================================================================

/// Operations exposed by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    UserRegister,
    UserDestroy,
    AssetEnroll,
    AssetExchange,
    QueryUser,
    QueryAsset,
    QueryAssetHistory,
}

impl Operation {
    /// Every routed operation.
    pub const ALL: [Operation; 7] = [
        Operation::UserRegister,
        Operation::UserDestroy,
        Operation::AssetEnroll,
        Operation::AssetExchange,
        Operation::QueryUser,
        Operation::QueryAsset,
        Operation::QueryAssetHistory,
    ];

    /// Canonical wire name.
    pub const fn name(&self) -> &'static str {
        match self {
            Operation::UserRegister => "userRegister",
            Operation::UserDestroy => "userDestroy",
            Operation::AssetEnroll => "assetEnroll",
            Operation::AssetExchange => "assetExchange",
            Operation::QueryUser => "queryUser",
            Operation::QueryAsset => "queryAsset",
            Operation::QueryAssetHistory => "queryAssetHistory",
        }
    }

    /// Look up an operation by wire name.
    pub fn from_name(name: &str) -> Option<Operation> {
        OPERATION_REGISTRY.get(name).map(|info| info.operation)
    }

    /// Routing metadata for this operation.
    pub fn info(&self) -> Option<&'static OperationInfo> {
        OPERATION_REGISTRY.get(self.name())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operation metadata.
#[derive(Debug, Clone)]
pub struct OperationInfo {
    pub operation: Operation,
    /// Does the operation stage writes?
    pub is_write: bool,
    /// Argument usage, as shown by the CLI.
    pub usage: &'static str,
    pub description: &'static str,
}

impl OperationInfo {
    const fn read(operation: Operation, usage: &'static str, description: &'static str) -> Self {
        Self {
            operation,
            is_write: false,
            usage,
            description,
        }
    }

    const fn write(operation: Operation, usage: &'static str, description: &'static str) -> Self {
        Self {
            operation,
            is_write: true,
            usage,
            description,
        }
    }
}

/// Routing table: wire name -> operation metadata.
pub static OPERATION_REGISTRY: LazyLock<HashMap<&'static str, OperationInfo>> =
    LazyLock::new(|| {
        let operations = [
            OperationInfo::write(
                Operation::UserRegister,
                "<name> <id>",
                "Register a user with no assets",
            ),
            OperationInfo::write(
                Operation::UserDestroy,
                "<id>",
                "Delete a user and every asset it owns",
            ),
            OperationInfo::write(
                Operation::AssetEnroll,
                "<name> <id> <metadata> <owner-id>",
                "Enroll a new asset for an existing user",
            ),
            OperationInfo::write(
                Operation::AssetExchange,
                "<origin-owner-id> <asset-id> <current-owner-id>",
                "Move an asset to another user",
            ),
            OperationInfo::read(Operation::QueryUser, "<id>", "Stored user record"),
            OperationInfo::read(Operation::QueryAsset, "<id>", "Stored asset record"),
            OperationInfo::read(
                Operation::QueryAssetHistory,
                "<asset-id> [all|enroll|exchange]",
                "Provenance records of an asset",
            ),
        ];
        operations
            .into_iter()
            .map(|info| (info.operation.name(), info))
            .collect()
    });

// =============================================================================
// RESPONSE
// =============================================================================

/// Outcome of one dispatched operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "body", rename_all = "snake_case")]
pub enum Response {
    /// Opaque payload: empty for writes, stored bytes or JSON for queries.
    Success(Vec<u8>),
    /// Structured failure.
    Error { code: String, message: String },
}

impl Response {
    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success(_))
    }

    /// Success payload, if any.
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Response::Success(payload) => Some(payload.as_slice()),
            Response::Error { .. } => None,
        }
    }

    /// Error code, if the operation failed.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Response::Success(_) => None,
            Response::Error { code, .. } => Some(code.as_str()),
        }
    }
}

impl From<Result<Vec<u8>, RegistryError>> for Response {
    fn from(result: Result<Vec<u8>, RegistryError>) -> Self {
        match result {
            Ok(payload) => Response::Success(payload),
            Err(err) => Response::Error {
                code: err.code().to_string(),
                message: err.to_string(),
            },
        }
    }
}

// =============================================================================
// DISPATCHER
// =============================================================================

/// Routes operations to a [`RegistryService`].
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    service: RegistryService,
}

impl Dispatcher {
    pub fn new(service: RegistryService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &RegistryService {
        &self.service
    }

    /// Run one operation against `store` and return its raw result.
    pub fn try_invoke(
        &self,
        store: &mut dyn StateStore,
        name: &str,
        args: &[String],
    ) -> Result<Vec<u8>, RegistryError> {
        let operation = Operation::from_name(name)
            .ok_or_else(|| RegistryError::UnsupportedOperation(name.to_string()))?;

        let service = &self.service;
        match operation {
            Operation::UserRegister => service.user_register(store, args),
            Operation::UserDestroy => service.user_destroy(store, args),
            Operation::AssetEnroll => service.asset_enroll(store, args),
            Operation::AssetExchange => service.asset_exchange(store, args),
            Operation::QueryUser => service.user_query(store, args),
            Operation::QueryAsset => service.asset_query(store, args),
            Operation::QueryAssetHistory => service.asset_history_query(store, args),
        }
    }

    /// Run one operation against `store`.
    ///
    /// Atomicity is the caller's: writes go to `store` as the operation
    /// stages them.
    #[instrument(skip(self, store, name, args), fields(operation = %name, tx_id = %uuid::Uuid::new_v4()))]
    pub fn invoke(&self, store: &mut dyn StateStore, name: &str, args: &[String]) -> Response {
        let result = self.try_invoke(store, name, args);
        log_outcome(&result);
        result.into()
    }

    /// Run one operation in its own ledger transaction.
    ///
    /// Commits on success. On failure, or if the commit is rejected, nothing
    /// the operation staged becomes visible.
    #[instrument(
        skip(self, ledger, name, args),
        fields(operation = %name, tx_id = %uuid::Uuid::new_v4())
    )]
    pub fn invoke_in_transaction<L: TransactionalLedger>(
        &self,
        ledger: &L,
        name: &str,
        args: &[String],
    ) -> Response {
        let mut tx = ledger.begin();
        let result = self.try_invoke(&mut tx, name, args).and_then(|payload| {
            let receipt = ledger.commit(tx)?;
            debug!(height = receipt.height, writes = receipt.writes, "committed");
            Ok(payload)
        });
        log_outcome(&result);
        result.into()
    }
}

fn log_outcome(result: &Result<Vec<u8>, RegistryError>) {
    match result {
        Ok(payload) => debug!(bytes = payload.len(), "operation succeeded"),
        Err(err) => warn!(code = err.code(), error = %err, "operation rejected"),
    }
}
