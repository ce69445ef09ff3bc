//! # Registry Entities
//!
//! Serializable records persisted in the ledger.
//!
//! The stored byte form is also the wire form returned by queries, so the
//! JSON field names and their order are part of the contract with data that
//! is already on the ledger. Note the historical `asserts` field name on
//! [`User`].

use crate::domain::errors::RegistryError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// USER
// =============================================================================

/// A registered user and the ids of the assets it currently owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name, fixed at registration.
    pub name: String,
    /// Unique user id.
    pub id: String,
    /// Owned asset ids in insertion order, without duplicates.
    #[serde(rename = "asserts", default, deserialize_with = "null_as_empty")]
    pub asset_ids: Vec<String>,
}

impl User {
    /// Create a user that owns nothing yet.
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            asset_ids: Vec::new(),
        }
    }

    /// Whether `asset_id` is in this user's ownership list.
    pub fn owns(&self, asset_id: &str) -> bool {
        self.asset_ids.iter().any(|id| id == asset_id)
    }

    /// Append an asset id. Returns `false` if it was already owned.
    pub fn add_asset(&mut self, asset_id: &str) -> bool {
        if self.owns(asset_id) {
            return false;
        }
        self.asset_ids.push(asset_id.to_string());
        true
    }

    /// Remove an asset id, keeping the order of the rest.
    /// Returns `false` if it was not owned.
    pub fn remove_asset(&mut self, asset_id: &str) -> bool {
        let before = self.asset_ids.len();
        self.asset_ids.retain(|id| id != asset_id);
        self.asset_ids.len() != before
    }
}

// =============================================================================
// ASSET
// =============================================================================

/// An enrolled asset. Ownership is not stored here; see [`User::asset_ids`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset name.
    pub name: String,
    /// Unique asset id.
    pub id: String,
    /// Opaque metadata supplied at enrollment.
    pub metadata: String,
}

impl Asset {
    /// Create an asset record.
    pub fn new(name: impl Into<String>, id: impl Into<String>, metadata: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            metadata: metadata.into(),
        }
    }
}

// =============================================================================
// ASSET HISTORY
// =============================================================================

/// One ownership change of an asset. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetHistory {
    /// Asset that changed hands.
    pub asset_id: String,
    /// Previous owner, or the origin placeholder for an enrollment.
    pub origin_owner_id: String,
    /// New owner.
    pub current_owner_id: String,
}

impl AssetHistory {
    /// Create a history record.
    pub fn new(
        asset_id: impl Into<String>,
        origin_owner_id: impl Into<String>,
        current_owner_id: impl Into<String>,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            origin_owner_id: origin_owner_id.into(),
            current_owner_id: current_owner_id.into(),
        }
    }

    /// Whether this record was written by an enrollment.
    pub fn is_enrollment(&self, origin_placeholder: &str) -> bool {
        self.origin_owner_id == origin_placeholder
    }
}

// =============================================================================
// HISTORY QUERY TYPE
// =============================================================================

/// Filter applied by the asset history query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryQuery {
    /// Every provenance record of the asset.
    #[default]
    All,
    /// Enrollment records only.
    Enroll,
    /// Transfers between users only.
    Exchange,
}

impl HistoryQuery {
    /// Wire name of the query type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Enroll => "enroll",
            Self::Exchange => "exchange",
        }
    }
}

impl fmt::Display for HistoryQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryQuery {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "enroll" => Ok(Self::Enroll),
            "exchange" => Ok(Self::Exchange),
            other => Err(RegistryError::InvalidArgument(format!(
                "queryType unknown: {other}"
            ))),
        }
    }
}

// =============================================================================
// JSON CODEC
// =============================================================================

/// Serialize a record to its stored form.
pub fn encode<T: Serialize>(record: &T, what: &'static str) -> Result<Vec<u8>, RegistryError> {
    serde_json::to_vec(record)
        .map_err(|e| RegistryError::Internal(format!("marshal {what} error: {e}")))
}

/// Deserialize a record from its stored form.
pub fn decode<T: DeserializeOwned>(bytes: &[u8], what: &'static str) -> Result<T, RegistryError> {
    serde_json::from_slice(bytes)
        .map_err(|e| RegistryError::Internal(format!("unmarshal {what} error: {e}")))
}

/// Older writers stored a missing ownership list as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
