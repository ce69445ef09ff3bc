//! # Registry Service - Helper Methods
//!
//! Argument checks and record loading shared by the operations.

use super::RegistryService;
use crate::domain::entities::{decode, encode, Asset, AssetHistory, User};
use crate::domain::errors::RegistryError;
use crate::domain::keys::{asset_key, history_key, user_key};
use crate::ports::outbound::{BatchOperation, StateStore};

/// Reject an empty required argument.
pub(crate) fn require(value: &str, name: &'static str) -> Result<(), RegistryError> {
    if value.is_empty() {
        return Err(RegistryError::InvalidArgument(format!(
            "{name} must not be empty"
        )));
    }
    Ok(())
}

/// Value stored at `key`, with an empty value read as absent.
pub(crate) fn read_present(
    store: &dyn StateStore,
    key: &[u8],
) -> Result<Option<Vec<u8>>, RegistryError> {
    Ok(store.get(key)?.filter(|value| !value.is_empty()))
}

impl RegistryService {
    /// The origin placeholder is reserved and never a user id.
    pub(crate) fn check_user_id(&self, id: &str) -> Result<(), RegistryError> {
        if id == self.config.origin_placeholder {
            return Err(RegistryError::InvalidArgument(format!(
                "user id {id:?} is reserved"
            )));
        }
        Ok(())
    }

    pub(crate) fn load_user_bytes(
        &self,
        store: &dyn StateStore,
        id: &str,
    ) -> Result<Vec<u8>, RegistryError> {
        read_present(store, &user_key(id))?.ok_or_else(|| RegistryError::user_not_found(id))
    }

    pub(crate) fn load_user(&self, store: &dyn StateStore, id: &str) -> Result<User, RegistryError> {
        decode(&self.load_user_bytes(store, id)?, "user")
    }

    pub(crate) fn load_asset_bytes(
        &self,
        store: &dyn StateStore,
        id: &str,
    ) -> Result<Vec<u8>, RegistryError> {
        read_present(store, &asset_key(id))?.ok_or_else(|| RegistryError::asset_not_found(id))
    }

    /// Fail if `user` cannot take one more asset under the ownership cap.
    pub(crate) fn ensure_capacity(&self, user: &User) -> Result<(), RegistryError> {
        match self.config.max_owned_assets {
            Some(max) if user.asset_ids.len() >= max => Err(RegistryError::InvalidArgument(
                format!("user {} already owns the maximum of {max} assets", user.id),
            )),
            _ => Ok(()),
        }
    }

    pub(crate) fn put_user(&self, user: &User) -> Result<BatchOperation, RegistryError> {
        Ok(BatchOperation::put(user_key(&user.id), encode(user, "user")?))
    }

    pub(crate) fn put_asset(&self, asset: &Asset) -> Result<BatchOperation, RegistryError> {
        Ok(BatchOperation::put(asset_key(&asset.id), encode(asset, "asset")?))
    }

    /// Stage the provenance record under its composite key.
    pub(crate) fn put_history(
        &self,
        store: &dyn StateStore,
        record: &AssetHistory,
    ) -> Result<BatchOperation, RegistryError> {
        let key = history_key(
            &record.asset_id,
            &record.origin_owner_id,
            &record.current_owner_id,
        );
        let key = store.composite_key(&key.namespace, &key.component_refs())?;
        Ok(BatchOperation::put(key, encode(record, "asset history")?))
    }
}
