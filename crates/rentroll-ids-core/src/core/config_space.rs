// crates/rentroll-ids-core/src/core/config_space.rs
// ============================================================================
// Module: Decoder Configuration Space
// Description: Candidate encoding parameters tried during token resolution.
// Purpose: Build a deterministic, ordered search space per domain.
// Dependencies: crate::core::identifiers
// ============================================================================

//! ## Overview
//! The encoding parameters used by the id-issuing service are not published,
//! so resolution guesses them. A [`DecoderConfigSpace`] is the ordered list of
//! guesses for one domain: every candidate secret crossed with every candidate
//! minimum length, sharing one optional alphabet override.
//!
//! Order is the only tie-break when several candidates decode the same token,
//! so generation is pure and stable: secrets first (base, override, then the
//! base-plus-domain variants), minimum lengths second (configured, then the
//! fixed fallbacks).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use crate::core::identifiers::Domain;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Minimum lengths always appended after the configured value.
pub const FALLBACK_MIN_LENGTHS: [usize; 4] = [0, 6, 8, 10];

/// Separators joining the base secret and the domain label, in search order.
pub const DOMAIN_SUFFIX_SEPARATORS: [&str; 5] = ["", "_", ":", "-", "."];

// ============================================================================
// SECTION: Decoder Configuration
// ============================================================================

/// One guessed set of encoding parameters.
///
/// # Invariants
/// - Immutable after construction; compared by value.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DecoderConfig {
    /// Secret (salt) shared with the issuing service.
    secret: String,
    /// Minimum padded token length.
    min_length: usize,
    /// Optional custom alphabet; `None` uses the scheme default.
    alphabet: Option<String>,
}

impl DecoderConfig {
    /// Creates a new decoder configuration.
    #[must_use]
    pub fn new(secret: impl Into<String>, min_length: usize, alphabet: Option<String>) -> Self {
        Self {
            secret: secret.into(),
            min_length,
            alphabet,
        }
    }

    /// Returns the secret.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Returns the minimum padded length.
    #[must_use]
    pub const fn min_length(&self) -> usize {
        self.min_length
    }

    /// Returns the alphabet override, if any.
    #[must_use]
    pub fn alphabet(&self) -> Option<&str> {
        self.alphabet.as_deref()
    }
}

// Secrets stay out of logs and panic messages.
impl fmt::Debug for DecoderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderConfig")
            .field("secret", &"<redacted>")
            .field("min_length", &self.min_length)
            .field("alphabet", &self.alphabet)
            .finish()
    }
}

// ============================================================================
// SECTION: Decoder Settings
// ============================================================================

/// Configuration inputs supplied once at process start.
///
/// # Invariants
/// - An empty `base_secret` yields empty candidate spaces for every domain.
#[derive(Clone, PartialEq, Eq)]
pub struct DecoderSettings {
    /// Primary key material seeding all candidate secrets.
    pub base_secret: String,
    /// Per-domain secret overrides (default to `base_secret`).
    pub domain_secrets: BTreeMap<Domain, String>,
    /// Configured minimum padded length.
    pub min_length: usize,
    /// Alphabet override applied to every candidate.
    pub alphabet: Option<String>,
    /// Whether full scans keep going to detect ambiguous matches.
    pub report_ambiguous: bool,
}

impl Default for DecoderSettings {
    fn default() -> Self {
        Self {
            base_secret: String::new(),
            domain_secrets: BTreeMap::new(),
            min_length: 0,
            alphabet: None,
            report_ambiguous: true,
        }
    }
}

impl DecoderSettings {
    /// Builds the candidate space for one domain.
    #[must_use]
    pub fn space_for(&self, domain: Domain) -> DecoderConfigSpace {
        DecoderConfigSpace::build(
            &self.base_secret,
            domain,
            self.domain_secrets.get(&domain).map(String::as_str),
            self.min_length,
            self.alphabet.as_deref(),
        )
    }
}

impl fmt::Debug for DecoderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderSettings")
            .field("base_secret", &"<redacted>")
            .field("domain_overrides", &self.domain_secrets.keys().collect::<Vec<_>>())
            .field("min_length", &self.min_length)
            .field("alphabet", &self.alphabet)
            .field("report_ambiguous", &self.report_ambiguous)
            .finish()
    }
}

// ============================================================================
// SECTION: Configuration Space
// ============================================================================

/// Ordered candidate configurations for one domain.
///
/// # Invariants
/// - Identical inputs always produce identical order.
/// - Immutable after construction; safe to share across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfigSpace {
    /// Domain the space was built for.
    domain: Domain,
    /// Candidates in search order.
    candidates: Vec<DecoderConfig>,
}

impl DecoderConfigSpace {
    /// Builds the ordered candidate space.
    ///
    /// `domain_secret` defaults to `base_secret` when absent or empty.
    #[must_use]
    pub fn build(
        base_secret: &str,
        domain: Domain,
        domain_secret: Option<&str>,
        min_length: usize,
        alphabet: Option<&str>,
    ) -> Self {
        if base_secret.is_empty() {
            return Self {
                domain,
                candidates: Vec::new(),
            };
        }
        let override_secret =
            domain_secret.filter(|secret| !secret.is_empty()).unwrap_or(base_secret);
        let mut secrets = vec![base_secret.to_string(), override_secret.to_string()];
        secrets.extend(
            DOMAIN_SUFFIX_SEPARATORS
                .iter()
                .map(|separator| format!("{base_secret}{separator}{}", domain.as_str())),
        );
        let secrets = dedup_ordered(secrets);

        let mut lengths = vec![min_length];
        lengths.extend(FALLBACK_MIN_LENGTHS);
        let lengths = dedup_ordered(lengths);

        let alphabet = alphabet.filter(|value| !value.is_empty()).map(str::to_string);
        let candidates = secrets
            .iter()
            .flat_map(|secret| {
                lengths
                    .iter()
                    .map(|length| DecoderConfig::new(secret.clone(), *length, alphabet.clone()))
            })
            .collect();
        Self {
            domain,
            candidates,
        }
    }

    /// Returns the domain this space was built for.
    #[must_use]
    pub const fn domain(&self) -> Domain {
        self.domain
    }

    /// Returns the candidates in search order.
    #[must_use]
    pub fn candidates(&self) -> &[DecoderConfig] {
        &self.candidates
    }

    /// Returns the candidate at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&DecoderConfig> {
        self.candidates.get(index)
    }

    /// Returns the position of `config` in search order.
    #[must_use]
    pub fn position(&self, config: &DecoderConfig) -> Option<usize> {
        self.candidates.iter().position(|candidate| candidate == config)
    }

    /// Returns the number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns true when no candidate exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Iterates candidates in search order.
    pub fn iter(&self) -> std::slice::Iter<'_, DecoderConfig> {
        self.candidates.iter()
    }
}

impl<'a> IntoIterator for &'a DecoderConfigSpace {
    type Item = &'a DecoderConfig;
    type IntoIter = std::slice::Iter<'a, DecoderConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Removes later duplicates while keeping first-seen order.
fn dedup_ordered<T: PartialEq>(values: Vec<T>) -> Vec<T> {
    let mut unique: Vec<T> = Vec::with_capacity(values.len());
    for value in values {
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    unique
}
