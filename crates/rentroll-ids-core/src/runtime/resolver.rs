// crates/rentroll-ids-core/src/runtime/resolver.rs
// ============================================================================
// Module: Domain Resolver
// Description: Cache-first, scan-second resolution of opaque identifiers.
// Purpose: Turn any opaque id into a verified positive id or a named failure.
// Dependencies: crate::{audit, core, runtime}
// ============================================================================

//! ## Overview
//! A [`Resolver`] serves one domain. Each call runs a complete, synchronous
//! state machine:
//!
//! - decimal literals resolve to their own value with no decoding at all;
//! - otherwise the cached configuration is tried first;
//! - on a cache miss the candidate space is scanned in order and the first
//!   candidate that decodes wins and is promoted into the cache;
//! - if nothing decodes, the call fails with [`DecodeFailure`].
//!
//! The cache is only trusted when it decodes the token at hand, so a racing
//! writer can cost a rescan but never yields a wrong id.
//!
//! [`Resolver::try_resolve`] runs the same steps for callers that treat an
//! unresolvable token as a normal answer; it records no failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use serde::Serialize;

use crate::audit::NoopAuditSink;
use crate::audit::ResolutionAuditEvent;
use crate::audit::ResolutionAuditEventParams;
use crate::audit::ResolutionAuditSink;
use crate::audit::ResolutionEventKind;
use crate::core::DecodeFailure;
use crate::core::DecoderConfig;
use crate::core::DecoderConfigSpace;
use crate::core::DecoderSettings;
use crate::core::Domain;
use crate::core::OpaqueId;
use crate::core::ResolvedId;
use crate::runtime::cache::ActiveDecoderCache;
use crate::runtime::decoder::DecodeOutcome;
use crate::runtime::decoder::PreparedDecoder;
use crate::runtime::equivalence::EquivalenceIndex;
use crate::runtime::numericizer::PayloadNumericizer;

// ============================================================================
// SECTION: Statistics
// ============================================================================

/// Snapshot of a resolver's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolverStats {
    /// Calls answered by the decimal-literal short-circuit.
    pub literal_hits: u64,
    /// Calls answered by the cached configuration.
    pub cache_hits: u64,
    /// Calls where the cache was empty or did not decode the token.
    pub cache_misses: u64,
    /// Full candidate scans started.
    pub scans: u64,
    /// Individual decode attempts (cache and scan).
    pub candidate_attempts: u64,
    /// Scans that changed the cached configuration.
    pub promotions: u64,
    /// Calls that ended in a decode failure.
    pub failures: u64,
    /// Scans where more than one candidate decoded the token.
    pub ambiguous_matches: u64,
}

/// Live counters backing [`ResolverStats`].
#[derive(Debug, Default)]
struct ResolverCounters {
    /// See [`ResolverStats::literal_hits`].
    literal_hits: AtomicU64,
    /// See [`ResolverStats::cache_hits`].
    cache_hits: AtomicU64,
    /// See [`ResolverStats::cache_misses`].
    cache_misses: AtomicU64,
    /// See [`ResolverStats::scans`].
    scans: AtomicU64,
    /// See [`ResolverStats::candidate_attempts`].
    candidate_attempts: AtomicU64,
    /// See [`ResolverStats::promotions`].
    promotions: AtomicU64,
    /// See [`ResolverStats::failures`].
    failures: AtomicU64,
    /// See [`ResolverStats::ambiguous_matches`].
    ambiguous_matches: AtomicU64,
}

impl ResolverCounters {
    /// Increments one counter.
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads all counters.
    fn snapshot(&self) -> ResolverStats {
        ResolverStats {
            literal_hits: self.literal_hits.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            scans: self.scans.load(Ordering::Relaxed),
            candidate_attempts: self.candidate_attempts.load(Ordering::Relaxed),
            promotions: self.promotions.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            ambiguous_matches: self.ambiguous_matches.load(Ordering::Relaxed),
        }
    }
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// First successful candidate of a scan, plus what the rest of the scan saw.
struct ScanHit<'a> {
    /// Candidate position in the space.
    index: usize,
    /// Accepted candidate.
    config: &'a DecoderConfig,
    /// Id decoded by the accepted candidate.
    id: ResolvedId,
    /// Later candidates that also decoded the token.
    alternatives: usize,
    /// Whether any later candidate decoded a different id.
    conflicting: bool,
}

/// Resolver for one domain.
///
/// # Invariants
/// - The cache is consulted before any scan.
/// - Only strictly positive ids are ever returned.
pub struct Resolver {
    /// Candidate space (immutable, shareable).
    space: Arc<DecoderConfigSpace>,
    /// Active configuration slot owned by this domain.
    cache: Arc<ActiveDecoderCache>,
    /// Codecs for each candidate, in search order.
    prepared: Vec<PreparedDecoder>,
    /// Destination for resolution events.
    audit: Arc<dyn ResolutionAuditSink>,
    /// Whether scans continue past the first hit to detect ambiguity.
    report_ambiguous: bool,
    /// Instrumentation counters.
    counters: ResolverCounters,
}

impl Resolver {
    /// Creates a resolver over `space` using `cache` as its active slot.
    ///
    /// Ambiguity reporting is on and events are discarded until a sink is set.
    #[must_use]
    pub fn new(space: Arc<DecoderConfigSpace>, cache: Arc<ActiveDecoderCache>) -> Self {
        let prepared = space.iter().map(PreparedDecoder::new).collect();
        Self {
            space,
            cache,
            prepared,
            audit: Arc::new(NoopAuditSink),
            report_ambiguous: true,
            counters: ResolverCounters::default(),
        }
    }

    /// Routes resolution events to `audit`.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn ResolutionAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Enables or disables ambiguity detection during scans.
    #[must_use]
    pub fn with_ambiguity_reporting(mut self, enabled: bool) -> Self {
        self.report_ambiguous = enabled;
        self
    }

    /// Returns the resolver's domain.
    #[must_use]
    pub fn domain(&self) -> Domain {
        self.space.domain()
    }

    /// Returns the candidate space.
    #[must_use]
    pub fn space(&self) -> &DecoderConfigSpace {
        &self.space
    }

    /// Returns the currently cached configuration.
    #[must_use]
    pub fn active_config(&self) -> Option<DecoderConfig> {
        self.cache.get()
    }

    /// Returns a snapshot of the resolver's counters.
    #[must_use]
    pub fn stats(&self) -> ResolverStats {
        self.counters.snapshot()
    }

    /// Resolves `token` to a positive id.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeFailure`] when the token is a zero or overflowing
    /// literal, or when no candidate decodes it.
    pub fn resolve(&self, token: &OpaqueId) -> Result<ResolvedId, DecodeFailure> {
        self.lookup(token).ok_or_else(|| self.fail(token))
    }

    /// Resolves `token`, returning `None` instead of a failure.
    ///
    /// Runs the same literal, cache and scan steps as [`Self::resolve`] and
    /// promotes the cache the same way, but never emits a decode failure
    /// event or counts a failure.
    #[must_use]
    pub fn try_resolve(&self, token: &OpaqueId) -> Option<ResolvedId> {
        self.lookup(token)
    }

    /// Literal, cache and scan steps shared by both resolution entry points.
    fn lookup(&self, token: &OpaqueId) -> Option<ResolvedId> {
        if token.is_numeric_literal() {
            ResolverCounters::bump(&self.counters.literal_hits);
            return token.literal_value();
        }

        let cached = self.cache.get();
        if let Some(config) = &cached {
            ResolverCounters::bump(&self.counters.candidate_attempts);
            if let Some(id) = self.decode_cached(token.as_str(), config).resolved() {
                ResolverCounters::bump(&self.counters.cache_hits);
                return Some(id);
            }
        }
        ResolverCounters::bump(&self.counters.cache_misses);

        let hit = self.scan(token, cached.as_ref())?;
        if hit.alternatives > 0 {
            ResolverCounters::bump(&self.counters.ambiguous_matches);
            self.emit(ResolutionAuditEventParams {
                domain: self.domain(),
                kind: ResolutionEventKind::AmbiguousMatch,
                token: token.as_str().to_string(),
                candidate_index: Some(hit.index),
                min_length: Some(hit.config.min_length()),
                resolved_id: Some(hit.id.get()),
                alternatives: Some(hit.alternatives),
                conflicting: Some(hit.conflicting),
            });
        }
        if self.cache.promote(hit.config) {
            ResolverCounters::bump(&self.counters.promotions);
            self.emit(ResolutionAuditEventParams {
                domain: self.domain(),
                kind: ResolutionEventKind::CachePromoted,
                token: token.as_str().to_string(),
                candidate_index: Some(hit.index),
                min_length: Some(hit.config.min_length()),
                resolved_id: Some(hit.id.get()),
                alternatives: None,
                conflicting: None,
            });
        }
        Some(hit.id)
    }

    /// Decodes under the cached configuration, reusing its prepared codec.
    fn decode_cached(&self, token: &str, config: &DecoderConfig) -> DecodeOutcome {
        match self.space.position(config).and_then(|index| self.prepared.get(index)) {
            Some(prepared) => prepared.decode(token),
            None => PreparedDecoder::new(config).decode(token),
        }
    }

    /// Scans the candidate space in order, skipping the configuration that
    /// already failed as the cached entry.
    fn scan(&self, token: &OpaqueId, skip: Option<&DecoderConfig>) -> Option<ScanHit<'_>> {
        ResolverCounters::bump(&self.counters.scans);
        let mut hit: Option<ScanHit<'_>> = None;
        for (index, (candidate, prepared)) in self.space.iter().zip(&self.prepared).enumerate() {
            if skip == Some(candidate) {
                continue;
            }
            ResolverCounters::bump(&self.counters.candidate_attempts);
            let Some(id) = prepared.decode(token.as_str()).resolved() else {
                continue;
            };
            if let Some(first) = hit.as_mut() {
                first.alternatives += 1;
                first.conflicting |= first.id != id;
                continue;
            }
            hit = Some(ScanHit {
                index,
                config: candidate,
                id,
                alternatives: 0,
                conflicting: false,
            });
            if !self.report_ambiguous {
                break;
            }
        }
        hit
    }

    /// Records a failure and builds the error.
    fn fail(&self, token: &OpaqueId) -> DecodeFailure {
        ResolverCounters::bump(&self.counters.failures);
        self.emit(ResolutionAuditEventParams {
            domain: self.domain(),
            kind: ResolutionEventKind::DecodeFailure,
            token: token.as_str().to_string(),
            candidate_index: None,
            min_length: None,
            resolved_id: None,
            alternatives: None,
            conflicting: None,
        });
        DecodeFailure::new(token.clone(), self.domain())
    }

    /// Sends an event to the audit sink.
    fn emit(&self, params: ResolutionAuditEventParams) {
        self.audit.record(&ResolutionAuditEvent::new(params));
    }
}

// ============================================================================
// SECTION: Domain Resolvers
// ============================================================================

/// One independent resolver per domain.
///
/// # Invariants
/// - Caches are never shared between domains.
pub struct DomainResolvers {
    /// Permissions resolver.
    permissions: Resolver,
    /// Offices resolver.
    offices: Resolver,
    /// Roles resolver.
    roles: Resolver,
}

impl DomainResolvers {
    /// Builds resolvers for every domain from process settings.
    #[must_use]
    pub fn from_settings(settings: &DecoderSettings, audit: Arc<dyn ResolutionAuditSink>) -> Self {
        let build = |domain: Domain| {
            Resolver::new(Arc::new(settings.space_for(domain)), Arc::new(ActiveDecoderCache::new()))
                .with_audit(Arc::clone(&audit))
                .with_ambiguity_reporting(settings.report_ambiguous)
        };
        Self {
            permissions: build(Domain::Permissions),
            offices: build(Domain::Offices),
            roles: build(Domain::Roles),
        }
    }

    /// Returns the resolver for `domain`.
    #[must_use]
    pub const fn get(&self, domain: Domain) -> &Resolver {
        match domain {
            Domain::Permissions => &self.permissions,
            Domain::Offices => &self.offices,
            Domain::Roles => &self.roles,
        }
    }

    /// Returns an equivalence index for `domain`.
    #[must_use]
    pub const fn index(&self, domain: Domain) -> EquivalenceIndex<'_> {
        EquivalenceIndex::new(self.get(domain))
    }

    /// Returns a payload numericizer for `domain`.
    #[must_use]
    pub const fn numericizer(&self, domain: Domain) -> PayloadNumericizer<'_> {
        PayloadNumericizer::new(self.get(domain))
    }
}
