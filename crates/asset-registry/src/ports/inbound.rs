//! # Driving Ports (API - Inbound)
//!
//! Typed registry API. Every method runs against the state store handle of
//! the transaction it belongs to.

use crate::domain::entities::{AssetHistory, HistoryQuery, User};
use crate::domain::errors::RegistryError;
use crate::ports::outbound::StateStore;

/// Asset registry operations.
///
/// Writes follow read-verify-write: existence and ownership are checked
/// before anything is staged, and all writes of one call are committed with
/// a single atomic batch.
pub trait AssetRegistryApi {
    /// Register a new user with an empty ownership list.
    fn register_user(
        &self,
        store: &mut dyn StateStore,
        name: &str,
        id: &str,
    ) -> Result<User, RegistryError>;

    /// Delete a user and every asset it owns. Returns the deleted asset ids.
    fn destroy_user(
        &self,
        store: &mut dyn StateStore,
        id: &str,
    ) -> Result<Vec<String>, RegistryError>;

    /// Enroll a new asset for an existing owner.
    fn enroll_asset(
        &self,
        store: &mut dyn StateStore,
        name: &str,
        id: &str,
        metadata: &str,
        owner_id: &str,
    ) -> Result<AssetHistory, RegistryError>;

    /// Move an asset from its current owner to another user.
    fn exchange_asset(
        &self,
        store: &mut dyn StateStore,
        origin_owner_id: &str,
        asset_id: &str,
        current_owner_id: &str,
    ) -> Result<AssetHistory, RegistryError>;

    /// Raw stored bytes of a user record.
    fn query_user(&self, store: &dyn StateStore, id: &str) -> Result<Vec<u8>, RegistryError>;

    /// Raw stored bytes of an asset record.
    fn query_asset(&self, store: &dyn StateStore, id: &str) -> Result<Vec<u8>, RegistryError>;

    /// Provenance records of an asset, in scan order.
    fn query_asset_history(
        &self,
        store: &dyn StateStore,
        asset_id: &str,
        query: HistoryQuery,
    ) -> Result<Vec<AssetHistory>, RegistryError>;
}
