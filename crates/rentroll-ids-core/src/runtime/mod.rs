// crates/rentroll-ids-core/src/runtime/mod.rs
// ============================================================================
// Module: Rentroll Ids Runtime
// Description: Decoding, caching, resolution, and selection handling.
// Purpose: Group the stateful pieces of id resolution.
// Dependencies: crate::runtime::{cache, decoder, equivalence, numericizer, resolver}
// ============================================================================

//! ## Overview
//! Runtime components, leaves first: [`TokenDecoder`] decodes one token under
//! one configuration, [`ActiveDecoderCache`] remembers what worked,
//! [`Resolver`] orchestrates both, and [`EquivalenceIndex`] and
//! [`PayloadNumericizer`] build on resolution for selections and payloads.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod cache;
pub mod decoder;
pub mod equivalence;
pub mod numericizer;
pub mod resolver;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use cache::ActiveDecoderCache;
pub use decoder::DecodeOutcome;
pub use decoder::DecodeShape;
pub use decoder::MAX_TOKEN_BYTES;
pub use decoder::PreparedDecoder;
pub use decoder::TokenDecoder;
pub use equivalence::EquivalenceIndex;
pub use equivalence::SelectionSet;
pub use numericizer::PayloadNumericizer;
pub use resolver::DomainResolvers;
pub use resolver::Resolver;
pub use resolver::ResolverStats;
