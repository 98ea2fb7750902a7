// crates/org-authz-core/src/core/request.rs
// ============================================================================
// Module: Org Authz Requests and Decisions
// Description: Request and decision structures for authorization checks.
// Purpose: Carry the decision subject and outcome across the engine boundary.
// Dependencies: serde, crate::core::identifiers
// ============================================================================

//! ## Overview
//! An [`AccessRequest`] names the user, resource, action, and tenant of a
//! single authorization check. The engine resolves the user's identity per
//! call; nothing in these types is cached between checks.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::Action;
use crate::core::identifiers::ResourceId;
use crate::core::identifiers::TenantId;

// ============================================================================
// SECTION: Decision Subject
// ============================================================================

/// Subject of an authorization decision, identified by username.
///
/// # Invariants
/// - The username is the caller-facing identity; the opaque user identifier
///   is resolved per decision call and never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User(String);

impl User {
    /// Creates a new decision subject from a username.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for User {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for User {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Request and Decision
// ============================================================================

/// Request for a single authorization check.
///
/// # Invariants
/// - The action is part of the enforcement contract; the mapping predicate
///   is keyed by the resource identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    /// Decision subject.
    pub user: User,
    /// Hierarchical resource/permission identifier being checked.
    pub resource_id: ResourceId,
    /// Action requested against the resource.
    pub action: Action,
    /// Tenant scoping the check.
    pub tenant_id: TenantId,
}

/// Outcome of an authorization check.
///
/// # Invariants
/// - Derived strictly from "at least one matching mapping row exists";
///   duplicate rows do not change the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    /// Whether the user is granted access.
    pub allowed: bool,
}

impl AccessDecision {
    /// Returns whether the decision granted access.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        self.allowed
    }
}
