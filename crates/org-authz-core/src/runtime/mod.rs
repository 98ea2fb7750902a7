// crates/org-authz-core/src/runtime/mod.rs
// ============================================================================
// Module: Org Authz Runtime
// Description: Decision engine, root-organization resolver, and helpers.
// Purpose: Evaluate authorization decisions against injected collaborators.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the decision procedure and root-organization
//! resolution. All enforcement surfaces must call into the same engine logic
//! so that every check is answered from current store state with identical
//! semantics.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod engine;
pub mod resolver;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use engine::DEFAULT_MAPPING_TYPE;
pub use engine::DEFAULT_PATH_SEPARATOR;
pub use engine::DecisionEngine;
pub use engine::DecisionEngineConfig;
pub use engine::DecisionError;
pub use resolver::OrgResolutionError;
pub use resolver::RootOrganizationResolver;
pub use store::InMemoryDirectory;
pub use store::InMemoryGateway;
pub use store::MappingRow;
pub use store::OrganizationRow;
