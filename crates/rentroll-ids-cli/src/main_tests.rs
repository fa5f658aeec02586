// crates/rentroll-ids-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for command helpers in the CLI entry point.
// Purpose: Ensure command output is complete, secret-free, and fails closed.
// Dependencies: rentroll-ids-cli main helpers
// ============================================================================

//! ## Overview
//! Validates the command helpers behind `resolve`, `encode`, `candidates`,
//! `numericize`, and the body builders, plus bounded draft reads.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::sync::Arc;

use rentroll_ids_core::ActiveDecoderCache;
use rentroll_ids_core::DecoderSettings;
use rentroll_ids_core::Domain;
use rentroll_ids_core::DomainResolvers;
use rentroll_ids_core::NoopAuditSink;
use rentroll_ids_core::OpaqueId;
use rentroll_ids_core::Resolver;
use rentroll_ids_core::RoleDraft;
use rentroll_ids_core::UserDraft;
use rentroll_ids_core::build_role_body;
use rentroll_ids_core::build_user_body;
use serde_json::json;

use super::ReadLimitError;
use super::describe_candidates;
use super::encode_ids;
use super::numericize_tokens;
use super::parse_draft;
use super::read_bytes_with_limit;
use super::resolve_tokens;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn resolvers() -> DomainResolvers {
    let settings = DecoderSettings {
        base_secret: "cli-secret".to_string(),
        min_length: 6,
        ..DecoderSettings::default()
    };
    DomainResolvers::from_settings(&settings, Arc::new(NoopAuditSink))
}

fn encoded(resolvers: &DomainResolvers, domain: Domain, ids: &[u64]) -> Vec<String> {
    let report = encode_ids(resolvers.get(domain).space(), 0, ids).unwrap();
    report.tokens.into_iter().map(|entry| entry.token).collect()
}

// ============================================================================
// SECTION: Command Tests
// ============================================================================

#[test]
fn encode_then_resolve_reports_every_token() {
    let resolvers = resolvers();
    let tokens = encoded(&resolvers, Domain::Offices, &[11, 12]);
    let mut inputs = tokens.clone();
    inputs.push("13".to_string());

    let report = resolve_tokens(&resolvers, Domain::Offices, &inputs).unwrap();
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({
            "domain": "offices",
            "results": [
                { "token": tokens[0], "id": 11 },
                { "token": tokens[1], "id": 12 },
                { "token": "13", "id": 13 },
            ],
        })
    );
}

#[test]
fn resolve_fails_on_first_unknown_token() {
    let resolvers = resolvers();
    let inputs = vec!["5".to_string(), "~zz~".to_string()];
    let error = resolve_tokens(&resolvers, Domain::Roles, &inputs).unwrap_err();
    assert_eq!(error.to_string(), "unable to resolve roles id '~zz~'");
}

#[test]
fn encode_rejects_bad_inputs() {
    let resolvers = resolvers();
    let space = resolvers.get(Domain::Permissions).space();

    let out_of_range = encode_ids(space, space.len(), &[1]).unwrap_err();
    assert!(out_of_range.to_string().contains("out of range"));

    let zero = encode_ids(space, 0, &[0]).unwrap_err();
    assert_eq!(zero.to_string(), "ids must be positive");
}

#[test]
fn encode_reports_candidate_min_length() {
    let resolvers = resolvers();
    let space = resolvers.get(Domain::Roles).space();
    let report = encode_ids(space, 1, &[255]).unwrap();
    assert_eq!(report.candidate, 1);
    assert_eq!(report.min_length, 0);
    assert_eq!(report.tokens.len(), 1);
}

#[test]
fn default_candidate_tokens_resolve_to_their_ids() {
    let resolvers = resolvers();
    let ids = [1, 7, 255, 4_096, 1_000_000_007];
    for domain in Domain::ALL {
        let tokens = encoded(&resolvers, domain, &ids);
        let report = resolve_tokens(&resolvers, domain, &tokens).unwrap();
        let resolved: Vec<u64> = report.results.iter().map(|entry| entry.id.get()).collect();
        assert_eq!(resolved, ids.to_vec(), "domain {domain}");
    }
}

#[test]
fn every_candidate_token_resolves_under_its_candidate() {
    let resolvers = resolvers();
    let space = resolvers.get(Domain::Roles).space();
    let ids = [1, 255, 65_535, 1_000_000_007];
    for candidate in 0 .. space.len() {
        let report = encode_ids(space, candidate, &ids).unwrap();
        let cache = Arc::new(ActiveDecoderCache::new());
        cache.promote(space.get(candidate).unwrap());
        let resolver = Resolver::new(Arc::new(space.clone()), cache);
        for entry in &report.tokens {
            let resolved = resolver.resolve(&OpaqueId::new(entry.token.clone())).unwrap();
            assert_eq!(resolved, entry.id, "candidate {candidate} token {}", entry.token);
        }
        assert_eq!(resolver.stats().scans, 0, "candidate {candidate}");
    }
}

#[test]
fn candidates_listing_never_contains_secrets() {
    let resolvers = resolvers();
    let report = describe_candidates(resolvers.get(Domain::Permissions).space());
    assert_eq!(report.candidates.len(), 24);
    assert_eq!(report.candidates[0].min_length, 6);
    assert!(report.candidates.iter().all(|entry| !entry.custom_alphabet));

    let rendered = serde_json::to_string(&report).unwrap();
    assert!(!rendered.contains("cli-secret"));
}

#[test]
fn numericize_deduplicates_and_fails_closed() {
    let resolvers = resolvers();
    let mut inputs = encoded(&resolvers, Domain::Permissions, &[3, 4]);
    inputs.push("3".to_string());

    let ids = numericize_tokens(&resolvers, Domain::Permissions, &inputs).unwrap();
    assert_eq!(serde_json::to_value(&ids).unwrap(), json!([3, 4]));

    inputs.push("nope!".to_string());
    assert!(numericize_tokens(&resolvers, Domain::Permissions, &inputs).is_err());
}

#[test]
fn drafts_parse_into_integer_bodies() {
    let resolvers = resolvers();
    let permission = encoded(&resolvers, Domain::Permissions, &[40]).remove(0);
    let role_draft: RoleDraft = parse_draft(
        json!({ "name": "Manager", "permissions": [permission, "41"] }).to_string().as_bytes(),
    )
    .unwrap();
    let role_body = build_role_body(&role_draft, &resolvers).unwrap();
    assert_eq!(
        serde_json::to_value(&role_body).unwrap(),
        json!({ "name": "Manager", "permissions": [40, 41] })
    );

    let office = encoded(&resolvers, Domain::Offices, &[2]).remove(0);
    let user_draft: UserDraft = parse_draft(
        json!({ "name": "Lee", "role": "7", "offices": [office] }).to_string().as_bytes(),
    )
    .unwrap();
    let user_body = build_user_body(&user_draft, &resolvers).unwrap();
    assert_eq!(
        serde_json::to_value(&user_body).unwrap(),
        json!({ "name": "Lee", "role_id": 7, "offices": [{ "id": 2 }] })
    );
}

#[test]
fn malformed_draft_is_rejected() {
    assert!(parse_draft::<RoleDraft>(b"{\"permissions\": []}").is_err());
    assert!(parse_draft::<UserDraft>(b"not json").is_err());
}

// ============================================================================
// SECTION: Bounded Read Tests
// ============================================================================

#[test]
fn read_bytes_with_limit_allows_small_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("draft.json");
    fs::write(&path, b"{}").unwrap();
    assert_eq!(read_bytes_with_limit(&path, 4).unwrap(), b"{}");
}

#[test]
fn read_bytes_with_limit_rejects_oversized_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("draft.json");
    fs::write(&path, vec![b' '; 16]).unwrap();
    match read_bytes_with_limit(&path, 8) {
        Err(ReadLimitError::TooLarge {
            size,
            limit,
        }) => {
            assert_eq!(size, 16);
            assert_eq!(limit, 8);
        }
        other => panic!("expected size limit error, got {other:?}"),
    }
}

#[test]
fn read_bytes_with_limit_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_bytes_with_limit(&dir.path().join("absent.json"), 8);
    assert!(matches!(result, Err(ReadLimitError::Io(_))));
}
