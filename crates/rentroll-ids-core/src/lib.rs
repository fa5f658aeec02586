// crates/rentroll-ids-core/src/lib.rs
// ============================================================================
// Module: Rentroll Ids Core Library
// Description: Public API surface for opaque id resolution.
// Purpose: Expose identifiers, resolvers, selection helpers, and wire payloads.
// Dependencies: crate::{audit, core, runtime, wire}
// ============================================================================

//! ## Overview
//! Rentroll Ids recovers plain database ids from opaque tokens issued by a
//! service whose encoding parameters are not published. Candidate parameters
//! are searched in a fixed order per domain, the winner is cached, and all
//! selection and payload logic compares ids by resolved value rather than by
//! token text. Write bodies are only ever built from fully resolved ids.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod runtime;
pub mod wire;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use audit::FileAuditSink;
pub use audit::InMemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::ResolutionAuditEvent;
pub use audit::ResolutionAuditSink;
pub use audit::ResolutionEventKind;
pub use audit::StderrAuditSink;
pub use runtime::ActiveDecoderCache;
pub use runtime::DecodeOutcome;
pub use runtime::DecodeShape;
pub use runtime::DomainResolvers;
pub use runtime::EquivalenceIndex;
pub use runtime::PayloadNumericizer;
pub use runtime::PreparedDecoder;
pub use runtime::Resolver;
pub use runtime::ResolverStats;
pub use runtime::SelectionSet;
pub use runtime::TokenDecoder;
pub use wire::OfficeRef;
pub use wire::RoleDraft;
pub use wire::RoleWriteBody;
pub use wire::UserDraft;
pub use wire::UserWriteBody;
pub use wire::build_role_body;
pub use wire::build_user_body;
pub use wire::extract_ids;
pub use wire::extract_references;
