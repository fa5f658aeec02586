// crates/rentroll-ids-core/src/core/identifiers.rs
// ============================================================================
// Module: Rentroll Identifiers
// Description: Opaque and resolved identifiers for tenant administration entities.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the identifiers that flow through id resolution.
//! [`OpaqueId`] is whatever an endpoint handed us (a decimal literal or an
//! encoded token). [`ResolvedId`] is the verified, strictly positive database
//! id that write requests carry. [`Domain`] names the independently cached
//! entity categories.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroU64;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

// ============================================================================
// SECTION: Domain
// ============================================================================

/// Entity category with its own decoder candidates and cache slot.
///
/// # Invariants
/// - Labels are stable; they seed secret variants and appear in audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Permissions attached to roles.
    Permissions,
    /// Offices attached to users.
    Offices,
    /// Roles assigned to users.
    Roles,
}

impl Domain {
    /// All domains in canonical order.
    pub const ALL: [Self; 3] = [Self::Permissions, Self::Offices, Self::Roles];

    /// Returns the stable label for the domain.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Permissions => "permissions",
            Self::Offices => "offices",
            Self::Roles => "roles",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Resolved Identifier
// ============================================================================

/// Verified database identifier.
///
/// # Invariants
/// - Always >= 1. Zero is a decode failure, never a valid id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedId(NonZeroU64);

impl ResolvedId {
    /// Creates a resolved identifier from a non-zero value.
    #[must_use]
    pub const fn new(id: NonZeroU64) -> Self {
        Self(id)
    }

    /// Creates a resolved identifier from a raw value (returns `None` if zero).
    #[must_use]
    pub const fn from_raw(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Returns the raw identifier value (always >= 1).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for ResolvedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.get().fmt(f)
    }
}

// ============================================================================
// SECTION: Opaque Identifier
// ============================================================================

/// Identifier as received from a list or detail endpoint.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization is applied.
/// - Equality here is string equality. Entity equivalence is decided by
///   resolution, see [`crate::runtime::EquivalenceIndex`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OpaqueId(String);

impl OpaqueId {
    /// Creates a new opaque identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the identifier is a plain decimal literal.
    #[must_use]
    pub fn is_numeric_literal(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|byte| byte.is_ascii_digit())
    }

    /// Returns the literal value for decimal identifiers.
    ///
    /// Returns `None` for encoded tokens and for literals that are zero or
    /// overflow `u64`.
    #[must_use]
    pub fn literal_value(&self) -> Option<ResolvedId> {
        if !self.is_numeric_literal() {
            return None;
        }
        self.0.parse::<u64>().ok().and_then(ResolvedId::from_raw)
    }
}

impl fmt::Display for OpaqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for OpaqueId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for OpaqueId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<ResolvedId> for OpaqueId {
    fn from(value: ResolvedId) -> Self {
        Self::new(value.get().to_string())
    }
}

/// Wire forms accepted for opaque identifiers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawOpaqueId {
    /// Token or decimal literal carried as a JSON string.
    Text(String),
    /// Plain JSON integer.
    Number(u64),
}

impl<'de> Deserialize<'de> for OpaqueId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawOpaqueId::deserialize(deserializer)? {
            RawOpaqueId::Text(text) => Ok(Self(text)),
            RawOpaqueId::Number(number) => Ok(Self(number.to_string())),
        }
    }
}
