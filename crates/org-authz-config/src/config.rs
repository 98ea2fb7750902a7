// crates/org-authz-config/src/config.rs
// ============================================================================
// Module: Org Authz Configuration
// Description: Configuration loading and validation for Org Authz.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: org-authz-core, org-authz-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path
//! limits. Missing or invalid configuration fails closed: every section is
//! validated before the configuration is handed to the decision engine or
//! the store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use org_authz_core::DEFAULT_MAPPING_TYPE;
use org_authz_core::DEFAULT_PATH_SEPARATOR;
use org_authz_core::DecisionEngineConfig;
use org_authz_core::MappingType;
use org_authz_store_sqlite::SqliteGatewayConfig;
use org_authz_store_sqlite::SqliteJournalMode;
use org_authz_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "org-authz.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "ORG_AUTHZ_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Minimum allowed store busy timeout in milliseconds.
pub(crate) const MIN_BUSY_TIMEOUT_MS: u64 = 100;
/// Maximum allowed store busy timeout in milliseconds.
pub(crate) const MAX_BUSY_TIMEOUT_MS: u64 = 60_000;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("config io error: {0}")]
    Io(String),
    /// Parsing the configuration file failed.
    #[error("config parse error: {0}")]
    Parse(String),
    /// The configuration is internally inconsistent.
    #[error("config invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Org Authz deployment configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OrgAuthzConfig {
    /// Decision engine configuration.
    #[serde(default)]
    pub decision: DecisionConfig,
    /// Persistence store configuration.
    pub store: StoreConfig,
}

impl OrgAuthzConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit path argument, then the `ORG_AUTHZ_CONFIG`
    /// environment variable, then `org-authz.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.decision.validate()?;
        self.store.validate()?;
        Ok(())
    }
}

/// Decision engine configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionConfig {
    /// Mapping-type discriminator matched by existence counts.
    #[serde(default = "default_mapping_type")]
    pub mapping_type: i32,
    /// Separator splitting permission paths into segments.
    #[serde(default = "default_path_separator")]
    pub path_separator: char,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            mapping_type: default_mapping_type(),
            path_separator: default_path_separator(),
        }
    }
}

impl DecisionConfig {
    /// Validates the decision section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the section is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path_separator.is_alphanumeric() {
            return Err(ConfigError::Invalid(
                "path separator must not be alphanumeric".to_string(),
            ));
        }
        if self.path_separator.is_whitespace() {
            return Err(ConfigError::Invalid(
                "path separator must not be whitespace".to_string(),
            ));
        }
        Ok(())
    }

    /// Converts the section into the engine's configuration type.
    #[must_use]
    pub const fn engine_config(&self) -> DecisionEngineConfig {
        DecisionEngineConfig {
            mapping_type: MappingType::new(self.mapping_type),
            path_separator: self.path_separator,
        }
    }
}

/// Persistence store configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteJournalMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl StoreConfig {
    /// Validates the store section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the section is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("store path must not be empty".to_string()));
        }
        if self.busy_timeout_ms < MIN_BUSY_TIMEOUT_MS || self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS
        {
            return Err(ConfigError::Invalid(format!(
                "store busy timeout out of range: {} (allowed {}..={})",
                self.busy_timeout_ms, MIN_BUSY_TIMEOUT_MS, MAX_BUSY_TIMEOUT_MS
            )));
        }
        Ok(())
    }

    /// Converts the section into the gateway's configuration type.
    #[must_use]
    pub fn gateway_config(&self) -> SqliteGatewayConfig {
        SqliteGatewayConfig {
            path: self.path.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
            sync_mode: self.sync_mode,
        }
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Returns the default mapping-type discriminator.
const fn default_mapping_type() -> i32 {
    DEFAULT_MAPPING_TYPE.get()
}

/// Returns the default permission-path separator.
const fn default_path_separator() -> char {
    DEFAULT_PATH_SEPARATOR
}

/// Returns the default store busy timeout in milliseconds.
const fn default_busy_timeout_ms() -> u64 {
    5_000
}

// ============================================================================
// SECTION: Path Resolution
// ============================================================================

/// Resolves the configuration path from argument, environment, or default.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    match env::var(CONFIG_ENV_VAR) {
        Ok(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => Ok(PathBuf::from(DEFAULT_CONFIG_NAME)),
    }
}

/// Validates the configuration path against component and total limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if let Component::Normal(part) = component
            && part.len() > MAX_PATH_COMPONENT_LENGTH
        {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}
