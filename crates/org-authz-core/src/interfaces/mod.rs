// crates/org-authz-core/src/interfaces/mod.rs
// ============================================================================
// Module: Org Authz Interfaces
// Description: Backend-agnostic interfaces for identity and persistence.
// Purpose: Define the contract surfaces consumed by the decision engine.
// Dependencies: crate::core, serde, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how Org Authz integrates with the externally owned
//! identity store and relational persistence layer without embedding
//! backend-specific details. Implementations must fail closed: a lookup
//! failure is an error, never a silent deny.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::MappingType;
use crate::core::identifiers::OrgId;
use crate::core::identifiers::TenantId;
use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: Identity Store
// ============================================================================

/// Identity store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// No identity exists for the supplied username.
    #[error("no identity found for username: {0}")]
    NotFound(String),
    /// Identity store reported an error.
    #[error("identity store error: {0}")]
    Store(String),
}

/// Backend-agnostic identity store mapping usernames to user identifiers.
pub trait IdentityStore {
    /// Resolves a username to its stable user identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NotFound`] when the username has no
    /// corresponding identity and [`IdentityError::Store`] on lookup
    /// failures.
    fn resolve_user_id(&self, username: &str) -> Result<UserId, IdentityError>;
}

// ============================================================================
// SECTION: Persistence Gateway
// ============================================================================

/// Parameter set for a mapping-existence count.
///
/// # Invariants
/// - `resource_id` is the full permission path being checked and
///   `parent_scope` is its parent; a stored mapping at either grants access.
/// - An empty `parent_scope` matches only mappings recorded at the literal
///   empty identifier, never any row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingProbe {
    /// Tenant scoping the count.
    pub tenant_id: TenantId,
    /// Resolved user identifier.
    pub user_id: UserId,
    /// Mapping-type discriminator to match.
    pub mapping_type: MappingType,
    /// Full permission path being checked.
    pub resource_id: String,
    /// Parent scope of the permission path.
    pub parent_scope: String,
}

/// Persistence gateway errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - "Query succeeded with zero rows" is a result, not an error.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Gateway I/O error.
    #[error("persistence gateway io error: {0}")]
    Io(String),
    /// Query execution failed.
    #[error("persistence gateway query failed: {0}")]
    Query(String),
    /// Gateway returned invalid data.
    #[error("persistence gateway invalid data: {0}")]
    Invalid(String),
}

/// Backend-agnostic read gateway over the relational permission store.
///
/// The three methods are the three logical query shapes the decision
/// component issues; row mapping and parameter binding are the
/// implementation's concern.
pub trait PersistenceGateway {
    /// Returns the identifiers of root organizations matching a name within
    /// a tenant.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the lookup fails.
    fn root_organizations(&self, name: &str, tenant_id: TenantId)
    -> Result<Vec<OrgId>, GatewayError>;

    /// Counts permission mappings matching the probe within one
    /// organization.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the count query fails.
    fn count_mappings_in_organization(
        &self,
        probe: &MappingProbe,
        org_id: &OrgId,
    ) -> Result<u64, GatewayError>;

    /// Counts permission mappings matching the probe across all
    /// organizations of the probe's tenant.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the count query fails.
    fn count_mappings_any_organization(&self, probe: &MappingProbe) -> Result<u64, GatewayError>;

    /// Reports gateway readiness for liveness/readiness probes.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the gateway is unavailable.
    fn readiness(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}
