// crates/org-authz-core/src/runtime/engine.rs
// ============================================================================
// Module: Org Authz Decision Engine
// Description: Stateless authorization decision evaluation.
// Purpose: Convert permission-mapping existence into grant/deny decisions.
// Dependencies: crate::{core, interfaces}, thiserror
// ============================================================================

//! ## Overview
//! The decision engine is the single canonical decision path for Org Authz.
//! Both operations share one algorithm and differ only in query scope:
//! checks may be scoped to one organization or span every organization a
//! user belongs to within a tenant. A grant recorded at a parent scope
//! authorizes all of its finer-grained children. Every failure propagates
//! as a typed error; no error is ever collapsed into a deny.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::identifiers::MappingType;
use crate::core::identifiers::OrgId;
use crate::core::permission::PathError;
use crate::core::permission::PermissionPath;
use crate::core::request::AccessDecision;
use crate::core::request::AccessRequest;
use crate::interfaces::GatewayError;
use crate::interfaces::IdentityError;
use crate::interfaces::IdentityStore;
use crate::interfaces::MappingProbe;
use crate::interfaces::PersistenceGateway;

// ============================================================================
// SECTION: Engine Configuration
// ============================================================================

/// Default mapping-type discriminator for organization permission mappings.
pub const DEFAULT_MAPPING_TYPE: MappingType = MappingType::new(3);
/// Default separator for hierarchical permission paths.
pub const DEFAULT_PATH_SEPARATOR: char = '/';

/// Configuration for the decision engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionEngineConfig {
    /// Mapping-type discriminator matched by existence counts.
    pub mapping_type: MappingType,
    /// Separator splitting permission paths into segments.
    pub path_separator: char,
}

impl Default for DecisionEngineConfig {
    fn default() -> Self {
        Self {
            mapping_type: DEFAULT_MAPPING_TYPE,
            path_separator: DEFAULT_PATH_SEPARATOR,
        }
    }
}

// ============================================================================
// SECTION: Engine Errors
// ============================================================================

/// Decision evaluation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Every variant preserves its original cause; none is ever translated
///   into `allowed = false`.
#[derive(Debug, Error)]
pub enum DecisionError {
    /// The supplied resource identifier is not a well-formed permission path.
    #[error(transparent)]
    Path(#[from] PathError),
    /// Identity resolution failed for the requesting user.
    #[error("user resolution failed: {0}")]
    Identity(#[from] IdentityError),
    /// The mapping-existence query failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

// ============================================================================
// SECTION: Decision Engine
// ============================================================================

/// Stateless decision engine over injected identity and persistence
/// collaborators.
pub struct DecisionEngine<I, G> {
    /// Identity store implementation.
    identity: I,
    /// Persistence gateway implementation.
    gateway: G,
    /// Engine configuration.
    config: DecisionEngineConfig,
}

impl<I, G> DecisionEngine<I, G>
where
    I: IdentityStore,
    G: PersistenceGateway,
{
    /// Creates a new decision engine.
    #[must_use]
    pub const fn new(identity: I, gateway: G, config: DecisionEngineConfig) -> Self {
        Self {
            identity,
            gateway,
            config,
        }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> DecisionEngineConfig {
        self.config
    }

    /// Decides whether the user is granted access within one organization.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError`] when identity resolution, path
    /// decomposition, or the existence count fails.
    pub fn is_authorized_in_organization(
        &self,
        request: &AccessRequest,
        org_id: &OrgId,
    ) -> Result<AccessDecision, DecisionError> {
        self.decide(request, Some(org_id))
    }

    /// Decides whether the user is granted access in at least one
    /// organization of the request's tenant.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError`] when identity resolution, path
    /// decomposition, or the existence count fails.
    pub fn is_authorized_in_any_organization(
        &self,
        request: &AccessRequest,
    ) -> Result<AccessDecision, DecisionError> {
        self.decide(request, None)
    }

    /// Shared decision algorithm for both query scopes.
    ///
    /// Identity resolution happens before any store access so that a missing
    /// identity surfaces as an error without issuing a persistence query.
    fn decide(
        &self,
        request: &AccessRequest,
        org_id: Option<&OrgId>,
    ) -> Result<AccessDecision, DecisionError> {
        let user_id = self.identity.resolve_user_id(request.user.username())?;
        let path =
            PermissionPath::decompose(request.resource_id.as_str(), self.config.path_separator)?;
        let probe = MappingProbe {
            tenant_id: request.tenant_id,
            user_id,
            mapping_type: self.config.mapping_type,
            resource_id: path.full().to_string(),
            parent_scope: path.parent_scope().to_string(),
        };
        let count = match org_id {
            Some(org_id) => self.gateway.count_mappings_in_organization(&probe, org_id)?,
            None => self.gateway.count_mappings_any_organization(&probe)?,
        };
        Ok(AccessDecision {
            allowed: count > 0,
        })
    }
}
