// crates/rentroll-ids-core/src/runtime/equivalence.rs
// ============================================================================
// Module: Equivalence Index
// Description: Selection-set operations keyed by resolved id.
// Purpose: Treat differently encoded tokens for one entity as one member.
// Dependencies: serde, crate::{core, runtime}
// ============================================================================

//! ## Overview
//! List and detail endpoints may encode the same entity differently. A
//! [`SelectionSet`] keeps the tokens it was given (for display), while the
//! [`EquivalenceIndex`] compares members by what they resolve to.
//!
//! Membership checks fail open: a token that cannot be resolved only ever
//! equals itself. Pre-filling a selection from a response is the exception
//! and fails closed with a named [`SelectionError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::OpaqueId;
use crate::core::ResolvedId;
use crate::core::SelectionError;
use crate::runtime::resolver::Resolver;

// ============================================================================
// SECTION: Selection Set
// ============================================================================

/// Currently chosen entities of one domain, in display order.
///
/// # Invariants
/// - Semantically a set of resolved ids; physically a list of opaque tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    /// Members as received.
    members: Vec<OpaqueId>,
}

impl SelectionSet {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Wraps `ids` as-is, without resolving or deduplicating.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = OpaqueId>) -> Self {
        Self {
            members: ids.into_iter().collect(),
        }
    }

    /// Builds a selection from a response, deduplicating by resolved id.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError`] naming `field` on the first id that does
    /// not resolve.
    pub fn prefill(
        index: &EquivalenceIndex<'_>,
        field: &str,
        ids: impl IntoIterator<Item = OpaqueId>,
    ) -> Result<Self, SelectionError> {
        let mut set = Self::new();
        for id in ids {
            index
                .resolver()
                .resolve(&id)
                .map_err(|failure| SelectionError::from_failure(field, failure))?;
            index.add(&mut set, id);
        }
        Ok(set)
    }

    /// Returns the members in display order.
    #[must_use]
    pub fn members(&self) -> &[OpaqueId] {
        &self.members
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates members in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, OpaqueId> {
        self.members.iter()
    }

    /// Returns true when `id` is present by string equality.
    #[must_use]
    pub fn contains_literal(&self, id: &OpaqueId) -> bool {
        self.members.contains(id)
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a OpaqueId;
    type IntoIter = std::slice::Iter<'a, OpaqueId>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

// ============================================================================
// SECTION: Equivalence Index
// ============================================================================

/// Resolution-aware set operations for one domain.
#[derive(Clone, Copy)]
pub struct EquivalenceIndex<'a> {
    /// Resolver for the selection's domain.
    resolver: &'a Resolver,
}

impl<'a> EquivalenceIndex<'a> {
    /// Creates an index over `resolver`'s domain.
    #[must_use]
    pub const fn new(resolver: &'a Resolver) -> Self {
        Self {
            resolver,
        }
    }

    /// Returns the underlying resolver.
    #[must_use]
    pub const fn resolver(&self) -> &'a Resolver {
        self.resolver
    }

    /// Returns true when `candidate` is present literally or resolves to the
    /// same id as any member.
    #[must_use]
    pub fn contains(&self, set: &SelectionSet, candidate: &OpaqueId) -> bool {
        if set.contains_literal(candidate) {
            return true;
        }
        let Some(target) = self.try_resolve(candidate) else {
            return false;
        };
        set.iter().any(|member| self.try_resolve(member) == Some(target))
    }

    /// Appends `id` unless an equivalent member exists; returns true when added.
    pub fn add(&self, set: &mut SelectionSet, id: OpaqueId) -> bool {
        if self.contains(set, &id) {
            return false;
        }
        set.members.push(id);
        true
    }

    /// Removes every member equivalent to `id`; returns how many were removed.
    pub fn remove(&self, set: &mut SelectionSet, id: &OpaqueId) -> usize {
        let target = self.try_resolve(id);
        let before = set.members.len();
        set.members.retain(|member| {
            if member == id {
                return false;
            }
            target.is_none() || self.try_resolve(member) != target
        });
        before - set.members.len()
    }

    /// Adds `id` when `should_be_present`, otherwise removes it.
    pub fn toggle(&self, set: &mut SelectionSet, id: OpaqueId, should_be_present: bool) {
        if should_be_present {
            self.add(set, id);
        } else {
            self.remove(set, &id);
        }
    }

    /// Resolves for comparison; failures compare unequal to everything.
    fn try_resolve(&self, id: &OpaqueId) -> Option<ResolvedId> {
        self.resolver.try_resolve(id)
    }
}
