//! # Registry Configuration
//!
//! Tunables for the registry operations. Defaults reproduce the behavior of
//! the records already stored on the ledger.

use std::str::FromStr;
use thiserror::Error;

/// Origin owner written into enrollment history records.
pub const DEFAULT_ORIGIN_PLACEHOLDER: &str = "originOwnerPlaceholder";

/// How the `enroll` history query narrows its composite-key scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnrollScan {
    /// Prefix `[asset_id, asset_id]`. This is the narrowing used by the
    /// deployed registry and is kept so queries return the same records.
    #[default]
    RepeatAssetId,
    /// Prefix `[asset_id, origin_placeholder]`, the shape enrollments are
    /// written with.
    Placeholder,
}

impl EnrollScan {
    /// Configuration name of the mode.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RepeatAssetId => "repeat-asset-id",
            Self::Placeholder => "placeholder",
        }
    }
}

impl FromStr for EnrollScan {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repeat-asset-id" => Ok(Self::RepeatAssetId),
            "placeholder" => Ok(Self::Placeholder),
            other => Err(ConfigError::UnknownEnrollScan(other.to_string())),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The origin placeholder is empty.
    #[error("origin placeholder must not be empty")]
    EmptyPlaceholder,

    /// The origin placeholder cannot be a composite key component.
    #[error("origin placeholder must not contain a NUL byte")]
    PlaceholderContainsNul,

    /// Unrecognized enroll scan mode.
    #[error("unknown enroll scan mode: {0} (expected repeat-asset-id or placeholder)")]
    UnknownEnrollScan(String),

    /// Ownership cap of zero would reject every enrollment.
    #[error("max owned assets must be greater than zero")]
    ZeroOwnershipCap,
}

/// Configuration for the registry service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Sentinel origin owner for enrollment records (default:
    /// `originOwnerPlaceholder`). Never accepted as a user id.
    pub origin_placeholder: String,

    /// Scan narrowing used by the `enroll` history query.
    pub enroll_scan: EnrollScan,

    /// Optional cap on the number of assets one user may own.
    pub max_owned_assets: Option<usize>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            origin_placeholder: DEFAULT_ORIGIN_PLACEHOLDER.to_string(),
            enroll_scan: EnrollScan::default(),
            max_owned_assets: None,
        }
    }
}

impl RegistryConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the origin placeholder.
    pub fn with_origin_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.origin_placeholder = placeholder.into();
        self
    }

    /// Set the enroll scan mode.
    pub fn with_enroll_scan(mut self, mode: EnrollScan) -> Self {
        self.enroll_scan = mode;
        self
    }

    /// Cap the number of assets a single user may own.
    pub fn with_max_owned_assets(mut self, max: usize) -> Self {
        self.max_owned_assets = Some(max);
        self
    }

    /// Check the configuration before building a service from it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.origin_placeholder.is_empty() {
            return Err(ConfigError::EmptyPlaceholder);
        }
        if self.origin_placeholder.contains('\0') {
            return Err(ConfigError::PlaceholderContainsNul);
        }
        if self.max_owned_assets == Some(0) {
            return Err(ConfigError::ZeroOwnershipCap);
        }
        Ok(())
    }
}
