// crates/org-authz-core/src/core/permission.rs
// ============================================================================
// Module: Org Authz Permission Paths
// Description: Decomposition of hierarchical permission identifiers.
// Purpose: Derive the parent scope that coarse-grained grants are recorded at.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A permission path is an ordered, non-empty sequence of segments joined by
//! a configurable separator, such as `permission/admin/view`. Ancestors are
//! coarser-grained scopes: a grant recorded at the parent scope implies a
//! grant on every descendant path. Decomposition is pure and side-effect
//! free; the only failures are degenerate inputs that carry no scope at all.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Permission path decomposition errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The supplied permission path was empty.
    #[error("permission path must not be empty")]
    Empty,
    /// The supplied permission path contains no segments.
    #[error("permission path contains no segments: {0:?}")]
    NoSegments(String),
}

// ============================================================================
// SECTION: Permission Path
// ============================================================================

/// Decomposed hierarchical permission identifier.
///
/// # Invariants
/// - `full` is the caller's input, unmodified.
/// - `parent_scope` is the join of all segments except the last and is the
///   empty string when exactly one segment exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionPath {
    /// Full permission path as supplied by the caller.
    full: String,
    /// Parent scope of the path (empty for single-segment paths).
    parent_scope: String,
}

impl PermissionPath {
    /// Decomposes a permission path into the full identifier and its parent
    /// scope.
    ///
    /// Trailing separators contribute no segments. A path consisting solely
    /// of separators has no final segment to scope and is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Empty`] for an empty input and
    /// [`PathError::NoSegments`] when no non-empty segment remains.
    pub fn decompose(path: &str, separator: char) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        let mut segments: Vec<&str> = path.split(separator).collect();
        while segments.last().is_some_and(|segment| segment.is_empty()) {
            segments.pop();
        }
        let Some((_, parents)) = segments.split_last() else {
            return Err(PathError::NoSegments(path.to_string()));
        };
        let sep = separator.to_string();
        Ok(Self {
            full: path.to_string(),
            parent_scope: parents.join(&sep),
        })
    }

    /// Returns the full permission path.
    #[must_use]
    pub fn full(&self) -> &str {
        &self.full
    }

    /// Returns the parent scope of the path.
    ///
    /// The parent scope is the empty string when the path has exactly one
    /// segment; the empty scope matches only mappings recorded at the
    /// literal empty identifier, never acting as a wildcard.
    #[must_use]
    pub fn parent_scope(&self) -> &str {
        &self.parent_scope
    }
}
