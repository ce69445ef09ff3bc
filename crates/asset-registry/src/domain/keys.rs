//! # Key Codec
//!
//! Canonical ledger keys for registry records.
//!
//! | Record | Key shape |
//! |--------|-----------|
//! | User | `user_{id}` (flat) |
//! | Asset | `asset_{id}` (flat) |
//! | AssetHistory | `history` + `[asset_id, origin_owner_id, current_owner_id]` (composite) |
//!
//! Flat keys are plain byte strings. Composite keys are kept structured here
//! and encoded by the state store, which owns the byte layout.

/// Flat key prefix for user records.
pub const USER_KEY_PREFIX: &str = "user_";

/// Flat key prefix for asset records.
pub const ASSET_KEY_PREFIX: &str = "asset_";

/// Composite key namespace for provenance records.
pub const HISTORY_NAMESPACE: &str = "history";

/// Build the flat key of a user record.
pub fn user_key(id: &str) -> Vec<u8> {
    format!("{USER_KEY_PREFIX}{id}").into_bytes()
}

/// Build the flat key of an asset record.
pub fn asset_key(id: &str) -> Vec<u8> {
    format!("{ASSET_KEY_PREFIX}{id}").into_bytes()
}

/// Build the composite key of one provenance record.
pub fn history_key(asset_id: &str, origin_owner_id: &str, current_owner_id: &str) -> CompositeKey {
    CompositeKey::new(
        HISTORY_NAMESPACE,
        vec![
            asset_id.to_string(),
            origin_owner_id.to_string(),
            current_owner_id.to_string(),
        ],
    )
}

/// Structured key made of a namespace and ordered components.
///
/// Any ordered prefix of `components` can be used for a range scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    /// Object namespace (e.g. `history`).
    pub namespace: String,
    /// Ordered key components.
    pub components: Vec<String>,
}

impl CompositeKey {
    /// Create a composite key.
    pub fn new(namespace: impl Into<String>, components: Vec<String>) -> Self {
        Self {
            namespace: namespace.into(),
            components,
        }
    }

    /// Borrow the components as string slices.
    pub fn component_refs(&self) -> Vec<&str> {
        self.components.iter().map(String::as_str).collect()
    }
}
