//! # Asset Registry API Implementation
//!
//! Implements the `AssetRegistryApi` trait.

use super::helpers::{read_present, require};
use super::RegistryService;
use crate::domain::config::EnrollScan;
use crate::domain::entities::{decode, Asset, AssetHistory, HistoryQuery, User};
use crate::domain::errors::{RecordKind, RegistryError};
use crate::domain::keys::{asset_key, user_key, HISTORY_NAMESPACE};
use crate::ports::inbound::AssetRegistryApi;
use crate::ports::outbound::{BatchOperation, StateStore};
use tracing::{debug, info};

impl AssetRegistryApi for RegistryService {
    fn register_user(
        &self,
        store: &mut dyn StateStore,
        name: &str,
        id: &str,
    ) -> Result<User, RegistryError> {
        require(name, "name")?;
        require(id, "id")?;
        self.check_user_id(id)?;

        if read_present(store, &user_key(id))?.is_some() {
            return Err(RegistryError::AlreadyExists {
                kind: RecordKind::User,
                id: id.to_string(),
            });
        }

        let user = User::new(name, id);
        store.atomic_batch_write(vec![self.put_user(&user)?])?;

        info!(user_id = %id, "user registered");
        Ok(user)
    }

    fn destroy_user(
        &self,
        store: &mut dyn StateStore,
        id: &str,
    ) -> Result<Vec<String>, RegistryError> {
        require(id, "id")?;
        let user = self.load_user(store, id)?;

        // Collect the whole cascade first so it lands as one batch.
        let mut operations = Vec::with_capacity(user.asset_ids.len() + 1);
        operations.push(BatchOperation::delete(user_key(id)));
        operations.extend(
            user.asset_ids
                .iter()
                .map(|asset_id| BatchOperation::delete(asset_key(asset_id))),
        );
        store.atomic_batch_write(operations)?;

        info!(user_id = %id, assets = user.asset_ids.len(), "user destroyed");
        Ok(user.asset_ids)
    }

    fn enroll_asset(
        &self,
        store: &mut dyn StateStore,
        name: &str,
        id: &str,
        metadata: &str,
        owner_id: &str,
    ) -> Result<AssetHistory, RegistryError> {
        require(name, "name")?;
        require(id, "id")?;
        require(metadata, "metadata")?;
        require(owner_id, "owner id")?;

        let mut owner = self.load_user(store, owner_id)?;
        if read_present(store, &asset_key(id))?.is_some() {
            return Err(RegistryError::AlreadyExists {
                kind: RecordKind::Asset,
                id: id.to_string(),
            });
        }
        self.ensure_capacity(&owner)?;

        let asset = Asset::new(name, id, metadata);
        owner.add_asset(id);
        let history = AssetHistory::new(id, &self.config.origin_placeholder, owner_id);

        let operations = vec![
            self.put_asset(&asset)?,
            self.put_user(&owner)?,
            self.put_history(store, &history)?,
        ];
        store.atomic_batch_write(operations)?;

        info!(asset_id = %id, owner_id = %owner_id, "asset enrolled");
        Ok(history)
    }

    fn exchange_asset(
        &self,
        store: &mut dyn StateStore,
        origin_owner_id: &str,
        asset_id: &str,
        current_owner_id: &str,
    ) -> Result<AssetHistory, RegistryError> {
        require(origin_owner_id, "origin owner id")?;
        require(asset_id, "asset id")?;
        require(current_owner_id, "current owner id")?;
        if origin_owner_id == current_owner_id {
            return Err(RegistryError::InvalidArgument(format!(
                "origin and current owner are both {origin_owner_id}"
            )));
        }

        let mut origin = self.load_user(store, origin_owner_id)?;
        let mut current = self.load_user(store, current_owner_id)?;
        self.load_asset_bytes(store, asset_id)?;

        if !origin.owns(asset_id) {
            return Err(RegistryError::OwnershipMismatch {
                asset_id: asset_id.to_string(),
                owner_id: origin_owner_id.to_string(),
            });
        }
        self.ensure_capacity(&current)?;

        origin.remove_asset(asset_id);
        current.add_asset(asset_id);
        let history = AssetHistory::new(asset_id, origin_owner_id, current_owner_id);

        let operations = vec![
            self.put_user(&origin)?,
            self.put_user(&current)?,
            self.put_history(store, &history)?,
        ];
        store.atomic_batch_write(operations)?;

        info!(
            asset_id = %asset_id,
            from = %origin_owner_id,
            to = %current_owner_id,
            "asset exchanged"
        );
        Ok(history)
    }

    fn query_user(&self, store: &dyn StateStore, id: &str) -> Result<Vec<u8>, RegistryError> {
        require(id, "id")?;
        let bytes = self.load_user_bytes(store, id)?;
        debug!(user_id = %id, bytes = bytes.len(), "user queried");
        Ok(bytes)
    }

    fn query_asset(&self, store: &dyn StateStore, id: &str) -> Result<Vec<u8>, RegistryError> {
        require(id, "id")?;
        let bytes = self.load_asset_bytes(store, id)?;
        debug!(asset_id = %id, bytes = bytes.len(), "asset queried");
        Ok(bytes)
    }

    fn query_asset_history(
        &self,
        store: &dyn StateStore,
        asset_id: &str,
        query: HistoryQuery,
    ) -> Result<Vec<AssetHistory>, RegistryError> {
        require(asset_id, "asset id")?;
        self.load_asset_bytes(store, asset_id)?;

        let placeholder = self.config.origin_placeholder.as_str();
        let prefix = match (query, self.config.enroll_scan) {
            (HistoryQuery::Enroll, EnrollScan::RepeatAssetId) => vec![asset_id, asset_id],
            (HistoryQuery::Enroll, EnrollScan::Placeholder) => vec![asset_id, placeholder],
            (HistoryQuery::All | HistoryQuery::Exchange, _) => vec![asset_id],
        };

        let mut histories = Vec::new();
        for row in store.scan_by_composite_prefix(HISTORY_NAMESPACE, &prefix)? {
            let (_, value) = row?;
            if value.is_empty() {
                continue;
            }
            let record: AssetHistory = decode(&value, "asset history")?;
            if query == HistoryQuery::Exchange && record.is_enrollment(placeholder) {
                continue;
            }
            histories.push(record);
        }

        debug!(
            asset_id = %asset_id,
            query = %query,
            records = histories.len(),
            "asset history queried"
        );
        Ok(histories)
    }
}
