// crates/org-authz-core/src/runtime/resolver.rs
// ============================================================================
// Module: Org Authz Root Organization Resolver
// Description: Resolution of root-organization identifiers by name.
// Purpose: Map (name, tenant) to the unique root organization identifier.
// Dependencies: crate::{core, interfaces}, thiserror
// ============================================================================

//! ## Overview
//! A root organization is the top-level organization node in a tenant's
//! hierarchy, uniquely identified by its name within the tenant in a
//! well-formed store. Resolution fails explicitly when that uniqueness does
//! not hold: zero rows is a checked not-found failure and more than one row
//! is an integrity violation rather than a silent first-row pick.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::identifiers::OrgId;
use crate::core::identifiers::TenantId;
use crate::interfaces::GatewayError;
use crate::interfaces::PersistenceGateway;

// ============================================================================
// SECTION: Resolver Errors
// ============================================================================

/// Root-organization resolution errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum OrgResolutionError {
    /// No root organization exists for the name within the tenant.
    #[error("no root organization named {name:?} in tenant {tenant_id}")]
    NotFound {
        /// Organization name that failed to resolve.
        name: String,
        /// Tenant the lookup was scoped to.
        tenant_id: TenantId,
    },
    /// More than one root organization matched the name within the tenant.
    #[error("{count} root organizations named {name:?} in tenant {tenant_id}")]
    Ambiguous {
        /// Organization name that resolved ambiguously.
        name: String,
        /// Tenant the lookup was scoped to.
        tenant_id: TenantId,
        /// Number of rows returned by the lookup.
        count: usize,
    },
    /// The underlying root-organization lookup failed.
    #[error("root organization lookup failed: {0}")]
    Store(#[from] GatewayError),
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolver mapping an organization name plus tenant to the unique root
/// organization identifier.
pub struct RootOrganizationResolver<G> {
    /// Persistence gateway implementation.
    gateway: G,
}

impl<G> RootOrganizationResolver<G>
where
    G: PersistenceGateway,
{
    /// Creates a new root-organization resolver.
    #[must_use]
    pub const fn new(gateway: G) -> Self {
        Self {
            gateway,
        }
    }

    /// Resolves the unique root organization identifier for a name within a
    /// tenant.
    ///
    /// # Errors
    ///
    /// Returns [`OrgResolutionError::NotFound`] when no row matches,
    /// [`OrgResolutionError::Ambiguous`] when more than one row matches, and
    /// [`OrgResolutionError::Store`] when the underlying lookup fails.
    pub fn resolve_root(
        &self,
        name: &str,
        tenant_id: TenantId,
    ) -> Result<OrgId, OrgResolutionError> {
        let mut ids = self.gateway.root_organizations(name, tenant_id)?;
        if ids.len() > 1 {
            return Err(OrgResolutionError::Ambiguous {
                name: name.to_string(),
                tenant_id,
                count: ids.len(),
            });
        }
        match ids.pop() {
            Some(id) => Ok(id),
            None => Err(OrgResolutionError::NotFound {
                name: name.to_string(),
                tenant_id,
            }),
        }
    }
}
