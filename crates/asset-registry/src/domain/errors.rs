//! # Error Types
//!
//! All error types for registry operations and state access.

use std::fmt;
use thiserror::Error;

// =============================================================================
// REGISTRY ERRORS
// =============================================================================

/// Kind of registry record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A user record.
    User,
    /// An asset record.
    Asset,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::User => f.write_str("user"),
            RecordKind::Asset => f.write_str("asset"),
        }
    }
}

/// Errors returned by registry operations and the dispatcher.
///
/// Every error is final for the transaction that produced it. Nothing is
/// retried internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Wrong arity or an empty required argument.
    #[error("invalid args: {0}")]
    InvalidArgument(String),

    /// Referenced record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    /// Record already exists (duplicate register/enroll).
    #[error("{kind} already exist: {id}")]
    AlreadyExists { kind: RecordKind, id: String },

    /// Exchange requested by a user that does not own the asset.
    #[error("asset owner not match: {owner_id} does not own {asset_id}")]
    OwnershipMismatch { asset_id: String, owner_id: String },

    /// Unknown operation name.
    #[error("unsupport function: {0}")]
    UnsupportedOperation(String),

    /// State store failure or corrupt stored record.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RegistryError {
    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::AlreadyExists { .. } => "ALREADY_EXISTS",
            Self::OwnershipMismatch { .. } => "OWNERSHIP_MISMATCH",
            Self::UnsupportedOperation(_) => "UNSUPPORTED_OPERATION",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Shorthand for a missing user.
    pub fn user_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: RecordKind::User,
            id: id.to_string(),
        }
    }

    /// Shorthand for a missing asset.
    pub fn asset_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: RecordKind::Asset,
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        RegistryError::Internal(err.to_string())
    }
}

// =============================================================================
// STORE ERRORS
// =============================================================================

/// Failures reported by a state store implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// I/O error during read/write.
    #[error("state store I/O error: {message}")]
    Io { message: String },

    /// Persisted data could not be decoded.
    #[error("state store corruption: {message}")]
    Corrupted { message: String },

    /// Composite key namespace or component is not encodable.
    #[error("invalid composite key: {reason}")]
    InvalidCompositeKey { reason: String },

    /// A key read by the transaction was changed by a concurrent commit.
    #[error("read conflict on key {key}: read version {read}, committed version {committed}")]
    Conflict {
        key: String,
        read: u64,
        committed: u64,
    },

    /// The ledger is held open by another process.
    #[error("ledger already in use: {message}")]
    Locked { message: String },
}

// =============================================================================
// TESTS
// =============================================================================
