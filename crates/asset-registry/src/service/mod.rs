//! # Registry Service
//!
//! The service implementing the asset registry API.
//!
//! ## Architecture
//!
//! This service:
//! 1. Implements `AssetRegistryApi` over any `StateStore` handle
//! 2. Exposes positional entry points (`user_register`, ...) for the dispatcher
//! 3. Validates arguments before the first store access
//! 4. Stages every write of one operation and commits it as one atomic batch

mod handlers;
mod helpers;
mod registry;

use crate::domain::config::{ConfigError, RegistryConfig};

/// The asset registry service.
///
/// Holds configuration only. All state lives in the store handle passed to
/// each call, so one service can serve any number of transactions.
#[derive(Debug, Clone, Default)]
pub struct RegistryService {
    pub(crate) config: RegistryConfig,
}

impl RegistryService {
    /// Create a service after validating `config`.
    pub fn new(config: RegistryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}
