// crates/rentroll-ids-config/src/lib.rs
// ============================================================================
// Module: Rentroll Ids Config Library
// Description: Canonical config model and fail-closed validation.
// Purpose: Single source of truth for rentroll-ids.toml semantics.
// Dependencies: rentroll-ids-core, serde, toml
// ============================================================================

//! ## Overview
//! `rentroll-ids-config` defines the configuration model for opaque id
//! resolution: decoder key material, the optional alphabet override, and the
//! audit sink. Loading is strict and fails closed; environment overrides are
//! applied through an injectable lookup.
//!
//! Security posture: decoder secrets are never echoed in errors or debug
//! output.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
