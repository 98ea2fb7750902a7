// crates/org-authz-store-sqlite/src/lib.rs
// ============================================================================
// Module: Org Authz SQLite Store Library
// Description: SQLite-backed PersistenceGateway implementation.
// Purpose: Expose the durable gateway and its configuration types.
// Dependencies: crate::store
// ============================================================================

//! ## Overview
//! This crate implements the [`org_authz_core::PersistenceGateway`] contract
//! over `SQLite`, providing the three read-query shapes the decision
//! component issues. Administration of organizations and permission
//! mappings is owned elsewhere; the public surface here is read-only.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteGateway;
pub use store::SqliteGatewayConfig;
pub use store::SqliteGatewayError;
pub use store::SqliteJournalMode;
pub use store::SqliteSyncMode;
