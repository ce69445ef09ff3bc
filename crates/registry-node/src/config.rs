//! # Node Configuration
//!
//! Ledger location, log filter and registry settings for one run.

use anyhow::{Context, Result};
use asset_registry::domain::config::RegistryConfig;
use std::path::PathBuf;

/// Ledger directory used when nothing else is configured.
pub const DEFAULT_LEDGER_PATH: &str = "./ledger";

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Directory holding the ledger snapshot and lock file.
    pub ledger_path: PathBuf,
    /// `tracing-subscriber` filter directive.
    pub log_filter: String,
    /// Registry service configuration.
    pub registry: RegistryConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            registry: RegistryConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`:
    ///
    /// - `REGISTRY_LEDGER_PATH`
    /// - `REGISTRY_ORIGIN_PLACEHOLDER`
    /// - `REGISTRY_ENROLL_SCAN` (`repeat-asset-id` | `placeholder`)
    /// - `REGISTRY_MAX_OWNED_ASSETS`
    /// - `RUST_LOG`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = lookup("REGISTRY_LEDGER_PATH") {
            config.ledger_path = PathBuf::from(path);
        }
        if let Some(placeholder) = lookup("REGISTRY_ORIGIN_PLACEHOLDER") {
            config.registry.origin_placeholder = placeholder;
        }
        if let Some(mode) = lookup("REGISTRY_ENROLL_SCAN") {
            config.registry.enroll_scan = mode
                .parse()
                .context("REGISTRY_ENROLL_SCAN is not a valid scan mode")?;
        }
        if let Some(max) = lookup("REGISTRY_MAX_OWNED_ASSETS") {
            let max: usize = max
                .parse()
                .with_context(|| format!("REGISTRY_MAX_OWNED_ASSETS={max:?} is not a number"))?;
            config.registry.max_owned_assets = Some(max);
        }
        if let Some(filter) = lookup("RUST_LOG") {
            config.log_filter = filter;
        }

        Ok(config)
    }

    /// Reject settings the registry cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.registry
            .validate()
            .context("invalid registry configuration")
    }
}
