// crates/rentroll-ids-core/src/core/error.rs
// ============================================================================
// Module: Resolution Errors
// Description: Failure types for id resolution, selection building, and payloads.
// Purpose: Give callers named, fail-closed errors at every id boundary.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`DecodeFailure`] is the single fatal outcome of resolution. The other
//! types wrap it for the boundary where it surfaced: [`SelectionError`] for
//! form pre-fill, [`PayloadError`] for write-body construction, and
//! [`WireError`] for inbound response shapes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::identifiers::Domain;
use crate::core::identifiers::OpaqueId;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// No candidate configuration produced a positive id for the token.
///
/// # Invariants
/// - Deterministic: retrying the same token against the same space fails again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to resolve {domain} id '{token}'")]
pub struct DecodeFailure {
    /// Token that failed to resolve.
    pub token: OpaqueId,
    /// Domain the resolution ran in.
    pub domain: Domain,
}

impl DecodeFailure {
    /// Creates a new decode failure.
    #[must_use]
    pub const fn new(token: OpaqueId, domain: Domain) -> Self {
        Self {
            token,
            domain,
        }
    }
}

/// Blocking validation error raised while building a selection from a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: unrecognized {domain} id '{token}'")]
pub struct SelectionError {
    /// Form field the selection belongs to.
    pub field: String,
    /// Domain of the offending id.
    pub domain: Domain,
    /// Offending value.
    pub token: OpaqueId,
}

impl SelectionError {
    /// Attaches a field name to a decode failure.
    #[must_use]
    pub fn from_failure(field: impl Into<String>, failure: DecodeFailure) -> Self {
        Self {
            field: field.into(),
            domain: failure.domain,
            token: failure.token,
        }
    }
}

/// Write-body construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// An id in the draft could not be resolved.
    #[error(transparent)]
    Decode(#[from] DecodeFailure),
    /// The draft shape is invalid.
    #[error("invalid payload draft: {0}")]
    Invalid(String),
}

/// Inbound response shape errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// The JSON value does not have the expected shape.
    #[error("unexpected response shape: {0}")]
    Shape(String),
}
