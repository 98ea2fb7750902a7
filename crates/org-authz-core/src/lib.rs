// crates/org-authz-core/src/lib.rs
// ============================================================================
// Module: Org Authz Core Library
// Description: Public API surface for the Org Authz core.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Org Authz core decides whether a user is granted access to a hierarchical
//! resource within a multi-tenant organization hierarchy. It is
//! backend-agnostic and integrates with identity and persistence systems
//! through explicit interfaces rather than embedding into any particular
//! store.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::GatewayError;
pub use interfaces::IdentityError;
pub use interfaces::IdentityStore;
pub use interfaces::MappingProbe;
pub use interfaces::PersistenceGateway;
pub use runtime::DEFAULT_MAPPING_TYPE;
pub use runtime::DEFAULT_PATH_SEPARATOR;
pub use runtime::DecisionEngine;
pub use runtime::DecisionEngineConfig;
pub use runtime::DecisionError;
pub use runtime::InMemoryDirectory;
pub use runtime::InMemoryGateway;
pub use runtime::MappingRow;
pub use runtime::OrgResolutionError;
pub use runtime::OrganizationRow;
pub use runtime::RootOrganizationResolver;
