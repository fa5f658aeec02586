// crates/rentroll-ids-core/src/runtime/numericizer.rs
// ============================================================================
// Module: Payload Numericizer
// Description: All-or-nothing conversion of selections into integer ids.
// Purpose: Guarantee write requests never carry an unresolved identifier.
// Dependencies: crate::{core, runtime}
// ============================================================================

//! ## Overview
//! The numericizer is the last stop before a write body is built. Either
//! every member resolves and the caller gets a complete id list, or the first
//! unresolved member is reported and no list exists at all.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::DecodeFailure;
use crate::core::OpaqueId;
use crate::core::ResolvedId;
use crate::runtime::resolver::Resolver;

// ============================================================================
// SECTION: Numericizer
// ============================================================================

/// Converts opaque selections into resolved ids for one domain.
#[derive(Clone, Copy)]
pub struct PayloadNumericizer<'a> {
    /// Resolver for the selection's domain.
    resolver: &'a Resolver,
}

impl<'a> PayloadNumericizer<'a> {
    /// Creates a numericizer over `resolver`'s domain.
    #[must_use]
    pub const fn new(resolver: &'a Resolver) -> Self {
        Self {
            resolver,
        }
    }

    /// Resolves every id, preserving order and dropping repeated ids.
    ///
    /// # Errors
    ///
    /// Returns the [`DecodeFailure`] of the first id that does not resolve.
    pub fn to_integers<'i>(
        &self,
        ids: impl IntoIterator<Item = &'i OpaqueId>,
    ) -> Result<Vec<ResolvedId>, DecodeFailure> {
        let mut resolved: Vec<ResolvedId> = Vec::new();
        for id in ids {
            let value = self.resolver.resolve(id)?;
            if !resolved.contains(&value) {
                resolved.push(value);
            }
        }
        Ok(resolved)
    }

    /// Resolves a single id.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeFailure`] when `id` does not resolve.
    pub fn to_integer(&self, id: &OpaqueId) -> Result<ResolvedId, DecodeFailure> {
        self.resolver.resolve(id)
    }
}
