//! # Positional Entry Points
//!
//! One method per routed operation. Each takes the raw argument list, checks
//! its arity, calls the typed API and encodes the success payload. Writes
//! succeed with an empty payload.

use super::RegistryService;
use crate::domain::entities::{encode, HistoryQuery};
use crate::domain::errors::RegistryError;
use crate::ports::inbound::AssetRegistryApi;
use crate::ports::outbound::StateStore;

/// Borrow exactly `N` arguments.
fn exact_args<const N: usize>(args: &[String]) -> Result<[&str; N], RegistryError> {
    if args.len() != N {
        return Err(RegistryError::InvalidArgument(format!(
            "expected {N} args, got {}",
            args.len()
        )));
    }
    Ok(std::array::from_fn(|i| args[i].as_str()))
}

impl RegistryService {
    /// `userRegister(name, id)`
    pub fn user_register(
        &self,
        store: &mut dyn StateStore,
        args: &[String],
    ) -> Result<Vec<u8>, RegistryError> {
        let [name, id] = exact_args(args)?;
        self.register_user(store, name, id)?;
        Ok(Vec::new())
    }

    /// `userDestroy(id)`
    pub fn user_destroy(
        &self,
        store: &mut dyn StateStore,
        args: &[String],
    ) -> Result<Vec<u8>, RegistryError> {
        let [id] = exact_args(args)?;
        self.destroy_user(store, id)?;
        Ok(Vec::new())
    }

    /// `assetEnroll(name, id, metadata, ownerId)`
    pub fn asset_enroll(
        &self,
        store: &mut dyn StateStore,
        args: &[String],
    ) -> Result<Vec<u8>, RegistryError> {
        let [name, id, metadata, owner_id] = exact_args(args)?;
        self.enroll_asset(store, name, id, metadata, owner_id)?;
        Ok(Vec::new())
    }

    /// `assetExchange(originOwnerId, assetId, currentOwnerId)`
    pub fn asset_exchange(
        &self,
        store: &mut dyn StateStore,
        args: &[String],
    ) -> Result<Vec<u8>, RegistryError> {
        let [origin_owner_id, asset_id, current_owner_id] = exact_args(args)?;
        self.exchange_asset(store, origin_owner_id, asset_id, current_owner_id)?;
        Ok(Vec::new())
    }

    /// `queryUser(id)`: the stored user bytes.
    pub fn user_query(
        &self,
        store: &dyn StateStore,
        args: &[String],
    ) -> Result<Vec<u8>, RegistryError> {
        let [id] = exact_args(args)?;
        self.query_user(store, id)
    }

    /// `queryAsset(id)`: the stored asset bytes.
    pub fn asset_query(
        &self,
        store: &dyn StateStore,
        args: &[String],
    ) -> Result<Vec<u8>, RegistryError> {
        let [id] = exact_args(args)?;
        self.query_asset(store, id)
    }

    /// `queryAssetHistory(assetId [, queryType])`: JSON array of records.
    pub fn asset_history_query(
        &self,
        store: &dyn StateStore,
        args: &[String],
    ) -> Result<Vec<u8>, RegistryError> {
        let (asset_id, query) = match args {
            [asset_id] => (asset_id.as_str(), HistoryQuery::All),
            [asset_id, query] => (asset_id.as_str(), query.parse()?),
            _ => {
                return Err(RegistryError::InvalidArgument(format!(
                    "expected 1 or 2 args, got {}",
                    args.len()
                )))
            }
        };
        let histories = self.query_asset_history(store, asset_id, query)?;
        encode(&histories, "asset history")
    }
}
