// crates/org-authz-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Persistence Gateway
// Description: Durable PersistenceGateway backed by SQLite.
// Purpose: Execute the root-organization and mapping-count read queries.
// Dependencies: org-authz-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`PersistenceGateway`] using `SQLite`.
//! The gateway issues only parameterized reads; the organization and
//! permission-mapping tables are written by the externally owned
//! administration subsystem. All failures map into the gateway's typed
//! error contract and no failure is ever reported as an empty result.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Component;
use std::path::PathBuf;
use std::sync::Mutex;

use org_authz_core::GatewayError;
use org_authz_core::MappingProbe;
use org_authz_core::OrgId;
use org_authz_core::PersistenceGateway;
use org_authz_core::TenantId;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the gateway.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

/// Root-organization lookup by name and tenant.
const ROOT_ORGANIZATIONS_QUERY: &str = "SELECT id FROM organization \
     WHERE name = ?1 AND tenant_id = ?2 AND parent_id IS NULL";

/// Mapping count scoped to one organization. Matching either the full
/// resource identifier or its parent scope encodes inheritance down the
/// hierarchy.
const COUNT_IN_ORGANIZATION_QUERY: &str = "SELECT COUNT(*) FROM permission_mapping \
     WHERE org_id = ?1 AND user_id = ?2 AND tenant_id = ?3 AND mapping_type = ?4 \
       AND resource_id IN (?5, ?6)";

/// Mapping count across all organizations of a tenant.
const COUNT_ANY_ORGANIZATION_QUERY: &str = "SELECT COUNT(*) FROM permission_mapping \
     WHERE user_id = ?1 AND tenant_id = ?2 AND mapping_type = ?3 \
       AND resource_id IN (?4, ?5)";

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteJournalMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteJournalMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` persistence gateway.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteGatewayConfig {
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

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Validates the database path against component and total length limits.
fn validate_db_path(config: &SqliteGatewayConfig) -> Result<(), SqliteGatewayError> {
    let path = &config.path;
    if path.as_os_str().is_empty() {
        return Err(SqliteGatewayError::Invalid("database path must not be empty".to_string()));
    }
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteGatewayError::Invalid("database path exceeds max length".to_string()));
    }
    for component in path.components() {
        if let Component::Normal(part) = component
            && part.len() > MAX_PATH_COMPONENT_LENGTH
        {
            return Err(SqliteGatewayError::Invalid(
                "database path component too long".to_string(),
            ));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` gateway errors raised while opening or querying the database.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SqliteGatewayError {
    /// Configuration or path validation failed.
    #[error("sqlite gateway invalid config: {0}")]
    Invalid(String),
    /// `SQLite` reported an error.
    #[error("sqlite gateway database error: {0}")]
    Db(String),
    /// Stored schema version is incompatible.
    #[error("sqlite gateway schema version mismatch: found {found}, expected {expected}")]
    VersionMismatch {
        /// Version recorded in the database.
        found: i64,
        /// Version this gateway understands.
        expected: i64,
    },
}

/// Maps an internal gateway error onto the core gateway contract.
fn sqlite_to_gateway_error(error: SqliteGatewayError) -> GatewayError {
    match error {
        SqliteGatewayError::Invalid(message) => GatewayError::Invalid(message),
        SqliteGatewayError::Db(message) => GatewayError::Query(message),
        mismatch @ SqliteGatewayError::VersionMismatch {
            ..
        } => GatewayError::Invalid(mismatch.to_string()),
    }
}

// ============================================================================
// SECTION: Gateway
// ============================================================================

/// Durable persistence gateway backed by a `SQLite` database file.
pub struct SqliteGateway {
    /// Database connection protected by a mutex.
    connection: Mutex<Connection>,
}

impl SqliteGateway {
    /// Opens the gateway, applying pragmas and initializing the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteGatewayError`] when the configuration is invalid,
    /// the database cannot be opened, or the stored schema version is
    /// incompatible.
    pub fn open(config: &SqliteGatewayConfig) -> Result<Self, SqliteGatewayError> {
        validate_db_path(config)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Runs a closure against the locked connection.
    fn with_connection<T>(
        &self,
        operation: impl FnOnce(&Connection) -> Result<T, SqliteGatewayError>,
    ) -> Result<T, GatewayError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| GatewayError::Io("sqlite gateway mutex poisoned".to_string()))?;
        operation(&guard).map_err(sqlite_to_gateway_error)
    }

    /// Executes a mapping-count query returning a single scalar.
    fn scalar_count(
        connection: &Connection,
        query: &str,
        bind: impl FnOnce(
            &mut rusqlite::CachedStatement<'_>,
        ) -> Result<i64, rusqlite::Error>,
    ) -> Result<u64, SqliteGatewayError> {
        let mut statement = connection
            .prepare_cached(query)
            .map_err(|err| SqliteGatewayError::Db(err.to_string()))?;
        let count = bind(&mut statement).map_err(|err| SqliteGatewayError::Db(err.to_string()))?;
        u64::try_from(count).map_err(|_| {
            SqliteGatewayError::Db(format!("negative mapping count returned: {count}"))
        })
    }
}

impl PersistenceGateway for SqliteGateway {
    fn root_organizations(
        &self,
        name: &str,
        tenant_id: TenantId,
    ) -> Result<Vec<OrgId>, GatewayError> {
        self.with_connection(|connection| {
            let mut statement = connection
                .prepare_cached(ROOT_ORGANIZATIONS_QUERY)
                .map_err(|err| SqliteGatewayError::Db(err.to_string()))?;
            let rows = statement
                .query_map(params![name, tenant_id.get()], |row| {
                    row.get::<_, String>(0).map(OrgId::new)
                })
                .map_err(|err| SqliteGatewayError::Db(err.to_string()))?;
            rows.collect::<Result<Vec<_>, _>>()
                .map_err(|err| SqliteGatewayError::Db(err.to_string()))
        })
    }

    fn count_mappings_in_organization(
        &self,
        probe: &MappingProbe,
        org_id: &OrgId,
    ) -> Result<u64, GatewayError> {
        self.with_connection(|connection| {
            Self::scalar_count(connection, COUNT_IN_ORGANIZATION_QUERY, |statement| {
                statement.query_row(
                    params![
                        org_id.as_str(),
                        probe.user_id.as_str(),
                        probe.tenant_id.get(),
                        probe.mapping_type.get(),
                        probe.resource_id,
                        probe.parent_scope,
                    ],
                    |row| row.get(0),
                )
            })
        })
    }

    fn count_mappings_any_organization(&self, probe: &MappingProbe) -> Result<u64, GatewayError> {
        self.with_connection(|connection| {
            Self::scalar_count(connection, COUNT_ANY_ORGANIZATION_QUERY, |statement| {
                statement.query_row(
                    params![
                        probe.user_id.as_str(),
                        probe.tenant_id.get(),
                        probe.mapping_type.get(),
                        probe.resource_id,
                        probe.parent_scope,
                    ],
                    |row| row.get(0),
                )
            })
        })
    }

    fn readiness(&self) -> Result<(), GatewayError> {
        self.with_connection(|connection| {
            connection
                .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map_err(|err| SqliteGatewayError::Db(err.to_string()))?;
            Ok(())
        })
    }
}

// ============================================================================
// SECTION: Connection Setup
// ============================================================================

/// Opens a `SQLite` connection with the configured pragmas applied.
fn open_connection(config: &SqliteGatewayConfig) -> Result<Connection, SqliteGatewayError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteGatewayError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for safe concurrent reads.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteGatewayConfig,
) -> Result<(), SqliteGatewayError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| SqliteGatewayError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteGatewayError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteGatewayError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteGatewayError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteGatewayError> {
    let tx = connection.transaction().map_err(|err| SqliteGatewayError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteGatewayError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteGatewayError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteGatewayError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS organization (
                    id TEXT NOT NULL PRIMARY KEY,
                    name TEXT NOT NULL,
                    tenant_id INTEGER NOT NULL,
                    parent_id TEXT REFERENCES organization (id)
                );
                CREATE INDEX IF NOT EXISTS idx_organization_name_tenant
                    ON organization (name, tenant_id);
                CREATE TABLE IF NOT EXISTS permission_mapping (
                    org_id TEXT NOT NULL REFERENCES organization (id),
                    user_id TEXT NOT NULL,
                    tenant_id INTEGER NOT NULL,
                    mapping_type INTEGER NOT NULL,
                    resource_id TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_permission_mapping_lookup
                    ON permission_mapping (tenant_id, user_id, mapping_type, resource_id);",
            )
            .map_err(|err| SqliteGatewayError::Db(err.to_string()))?;
        }
        Some(found) if found == SCHEMA_VERSION => {}
        Some(found) => {
            return Err(SqliteGatewayError::VersionMismatch {
                found,
                expected: SCHEMA_VERSION,
            });
        }
    }
    tx.commit().map_err(|err| SqliteGatewayError::Db(err.to_string()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
