// crates/rentroll-ids-core/src/core/mod.rs
// ============================================================================
// Module: Rentroll Ids Core Types
// Description: Identifier, configuration-space, and error types.
// Purpose: Group the value types shared by the resolution runtime.
// Dependencies: crate::core::{config_space, error, identifiers}
// ============================================================================

//! ## Overview
//! Value types only; nothing here holds mutable state.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config_space;
pub mod error;
pub mod identifiers;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config_space::DOMAIN_SUFFIX_SEPARATORS;
pub use config_space::DecoderConfig;
pub use config_space::DecoderConfigSpace;
pub use config_space::DecoderSettings;
pub use config_space::FALLBACK_MIN_LENGTHS;
pub use error::DecodeFailure;
pub use error::PayloadError;
pub use error::SelectionError;
pub use error::WireError;
pub use identifiers::Domain;
pub use identifiers::OpaqueId;
pub use identifiers::ResolvedId;
