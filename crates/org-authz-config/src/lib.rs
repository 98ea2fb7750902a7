// crates/org-authz-config/src/lib.rs
// ============================================================================
// Module: Org Authz Config Library
// Description: Configuration surface for Org Authz deployments.
// Purpose: Expose strict, fail-closed configuration loading.
// Dependencies: crate::config
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path
//! limits and validated before use. The decision section exposes the
//! mapping-type discriminator and permission-path separator as named
//! options; the store section wires the `SQLite` gateway.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConfigError;
pub use config::DecisionConfig;
pub use config::OrgAuthzConfig;
pub use config::StoreConfig;
