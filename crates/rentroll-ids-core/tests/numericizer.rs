// crates/rentroll-ids-core/tests/numericizer.rs
// ============================================================================
// Module: Payload Numericizer Tests
// Description: All-or-nothing conversion of selections into integer ids.
// Purpose: Ensure no partial id list escapes when any member is unresolved.
// ============================================================================
//! ## Overview
//! Numericizer tests for ordering, de-duplication, and fail-fast behavior.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::sync::Arc;

use rentroll_ids_core::ActiveDecoderCache;
use rentroll_ids_core::DecoderConfig;
use rentroll_ids_core::DecoderConfigSpace;
use rentroll_ids_core::Domain;
use rentroll_ids_core::OpaqueId;
use rentroll_ids_core::PayloadNumericizer;
use rentroll_ids_core::ResolvedId;
use rentroll_ids_core::Resolver;
use rentroll_ids_core::SelectionSet;
use rentroll_ids_core::TokenDecoder;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

fn resolver() -> Resolver {
    let space = DecoderConfigSpace::build("s3cr3t", Domain::Permissions, None, 6, None);
    Resolver::new(Arc::new(space), Arc::new(ActiveDecoderCache::new()))
}

fn token(id: u64, min_length: usize) -> OpaqueId {
    let config = DecoderConfig::new("s3cr3t", min_length, None);
    let id = ResolvedId::from_raw(id).unwrap();
    OpaqueId::new(TokenDecoder::new().encode(id, &config).unwrap())
}

fn raw(ids: &[ResolvedId]) -> Vec<u64> {
    ids.iter().copied().map(ResolvedId::get).collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn mixed_selection_resolves_in_order() {
    let resolver = resolver();
    let numericizer = PayloadNumericizer::new(&resolver);
    let selection = SelectionSet::from_ids([token(30, 6), OpaqueId::from("4"), token(12, 10)]);

    let ids = numericizer.to_integers(&selection).unwrap();
    assert_eq!(raw(&ids), vec![30, 4, 12]);
}

#[test]
fn repeated_ids_are_emitted_once() {
    let resolver = resolver();
    let numericizer = PayloadNumericizer::new(&resolver);
    let selection = SelectionSet::from_ids([
        token(30, 6),
        OpaqueId::from("30"),
        OpaqueId::from("2"),
        token(30, 10),
    ]);

    let ids = numericizer.to_integers(&selection).unwrap();
    assert_eq!(raw(&ids), vec![30, 2]);
}

#[test]
fn first_unresolved_member_aborts_the_list() {
    let resolver = resolver();
    let numericizer = PayloadNumericizer::new(&resolver);
    let selection =
        SelectionSet::from_ids([OpaqueId::from("1"), OpaqueId::from("~x~"), OpaqueId::from("~y~")]);

    let failure = numericizer.to_integers(&selection).unwrap_err();
    assert_eq!(failure.token.as_str(), "~x~");
    assert_eq!(failure.domain, Domain::Permissions);
    assert_eq!(resolver.stats().failures, 1);
}

#[test]
fn empty_selection_yields_empty_list() {
    let resolver = resolver();
    let numericizer = PayloadNumericizer::new(&resolver);
    assert!(numericizer.to_integers(&SelectionSet::new()).unwrap().is_empty());
}

#[test]
fn single_id_resolves() {
    let resolver = resolver();
    let numericizer = PayloadNumericizer::new(&resolver);
    assert_eq!(numericizer.to_integer(&token(64, 6)).unwrap().get(), 64);
    assert!(numericizer.to_integer(&OpaqueId::from("0")).is_err());
}
