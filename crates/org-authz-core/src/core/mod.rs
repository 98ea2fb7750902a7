// crates/org-authz-core/src/core/mod.rs
// ============================================================================
// Module: Org Authz Core Types
// Description: Canonical identifier, permission-path, and request structures.
// Purpose: Provide stable, serializable types for authorization decisions.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Core types define the identifiers, permission-path decomposition, and
//! request/decision structures used by the decision engine. These types are
//! the canonical source of truth for any enforcement layer built on top.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod identifiers;
pub mod permission;
pub mod request;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::Action;
pub use identifiers::MappingType;
pub use identifiers::OrgId;
pub use identifiers::ResourceId;
pub use identifiers::TenantId;
pub use identifiers::UserId;
pub use permission::PathError;
pub use permission::PermissionPath;
pub use request::AccessDecision;
pub use request::AccessRequest;
pub use request::User;
