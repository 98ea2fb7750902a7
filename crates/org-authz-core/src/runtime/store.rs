// crates/org-authz-core/src/runtime/store.rs
// ============================================================================
// Module: Org Authz In-Memory Collaborators
// Description: In-memory identity store and persistence gateway.
// Purpose: Provide deterministic collaborator implementations without external deps.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! This module provides simple in-memory implementations of
//! [`IdentityStore`] and [`PersistenceGateway`] for tests and local demos.
//! They are not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::identifiers::MappingType;
use crate::core::identifiers::OrgId;
use crate::core::identifiers::TenantId;
use crate::core::identifiers::UserId;
use crate::interfaces::GatewayError;
use crate::interfaces::IdentityError;
use crate::interfaces::IdentityStore;
use crate::interfaces::MappingProbe;
use crate::interfaces::PersistenceGateway;

// ============================================================================
// SECTION: Store Rows
// ============================================================================

/// Organization row held by the in-memory gateway.
///
/// # Invariants
/// - A root organization has no parent (`parent_id` is `None`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationRow {
    /// Organization identifier.
    pub id: OrgId,
    /// Human-readable organization name.
    pub name: String,
    /// Tenant owning the organization.
    pub tenant_id: TenantId,
    /// Parent organization, absent for roots.
    pub parent_id: Option<OrgId>,
}

/// Permission mapping row held by the in-memory gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRow {
    /// Tenant owning the mapping.
    pub tenant_id: TenantId,
    /// Resolved user identifier the mapping grants to.
    pub user_id: UserId,
    /// Organization the mapping is scoped to.
    pub org_id: OrgId,
    /// Mapping-type discriminator.
    pub mapping_type: MappingType,
    /// Resource identifier the grant is recorded at.
    pub resource_id: String,
}

// ============================================================================
// SECTION: In-Memory Identity Store
// ============================================================================

/// In-memory identity store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDirectory {
    /// Username to user-identifier map protected by a mutex.
    users: Arc<Mutex<BTreeMap<String, UserId>>>,
}

impl InMemoryDirectory {
    /// Creates a new in-memory identity store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Registers a username with its resolved user identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Store`] when the store mutex is poisoned.
    pub fn insert_user(
        &self,
        username: impl Into<String>,
        user_id: UserId,
    ) -> Result<(), IdentityError> {
        self.users
            .lock()
            .map_err(|_| IdentityError::Store("identity store mutex poisoned".to_string()))?
            .insert(username.into(), user_id);
        Ok(())
    }
}

impl IdentityStore for InMemoryDirectory {
    fn resolve_user_id(&self, username: &str) -> Result<UserId, IdentityError> {
        let guard = self
            .users
            .lock()
            .map_err(|_| IdentityError::Store("identity store mutex poisoned".to_string()))?;
        guard
            .get(username)
            .cloned()
            .ok_or_else(|| IdentityError::NotFound(username.to_string()))
    }
}

// ============================================================================
// SECTION: In-Memory Gateway
// ============================================================================

/// In-memory persistence gateway for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryGateway {
    /// Organization rows protected by a mutex.
    organizations: Arc<Mutex<Vec<OrganizationRow>>>,
    /// Permission mapping rows protected by a mutex.
    mappings: Arc<Mutex<Vec<MappingRow>>>,
}

impl InMemoryGateway {
    /// Creates a new in-memory gateway.
    #[must_use]
    pub fn new() -> Self {
        Self {
            organizations: Arc::new(Mutex::new(Vec::new())),
            mappings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Inserts an organization row.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Io`] when the gateway mutex is poisoned.
    pub fn insert_organization(&self, row: OrganizationRow) -> Result<(), GatewayError> {
        self.organizations
            .lock()
            .map_err(|_| GatewayError::Io("gateway mutex poisoned".to_string()))?
            .push(row);
        Ok(())
    }

    /// Inserts a permission mapping row.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Io`] when the gateway mutex is poisoned.
    pub fn insert_mapping(&self, row: MappingRow) -> Result<(), GatewayError> {
        self.mappings
            .lock()
            .map_err(|_| GatewayError::Io("gateway mutex poisoned".to_string()))?
            .push(row);
        Ok(())
    }
}

/// Returns whether a mapping row satisfies the probe, ignoring organization
/// scope.
fn matches_probe(row: &MappingRow, probe: &MappingProbe) -> bool {
    row.tenant_id == probe.tenant_id
        && row.user_id == probe.user_id
        && row.mapping_type == probe.mapping_type
        && (row.resource_id == probe.resource_id || row.resource_id == probe.parent_scope)
}

impl PersistenceGateway for InMemoryGateway {
    fn root_organizations(
        &self,
        name: &str,
        tenant_id: TenantId,
    ) -> Result<Vec<OrgId>, GatewayError> {
        let guard = self
            .organizations
            .lock()
            .map_err(|_| GatewayError::Io("gateway mutex poisoned".to_string()))?;
        Ok(guard
            .iter()
            .filter(|row| {
                row.name == name && row.tenant_id == tenant_id && row.parent_id.is_none()
            })
            .map(|row| row.id.clone())
            .collect())
    }

    fn count_mappings_in_organization(
        &self,
        probe: &MappingProbe,
        org_id: &OrgId,
    ) -> Result<u64, GatewayError> {
        let guard = self
            .mappings
            .lock()
            .map_err(|_| GatewayError::Io("gateway mutex poisoned".to_string()))?;
        let count = guard
            .iter()
            .filter(|row| row.org_id == *org_id && matches_probe(row, probe))
            .count();
        u64::try_from(count).map_err(|err| GatewayError::Invalid(err.to_string()))
    }

    fn count_mappings_any_organization(&self, probe: &MappingProbe) -> Result<u64, GatewayError> {
        let guard = self
            .mappings
            .lock()
            .map_err(|_| GatewayError::Io("gateway mutex poisoned".to_string()))?;
        let count = guard.iter().filter(|row| matches_probe(row, probe)).count();
        u64::try_from(count).map_err(|err| GatewayError::Invalid(err.to_string()))
    }
}
