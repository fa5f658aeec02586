// crates/rentroll-ids-core/tests/wire.rs
// ============================================================================
// Module: Wire Payload Tests
// Description: Response id extraction and integer-only write bodies.
// Purpose: Validate inbound shapes and that bodies never carry opaque ids.
// ============================================================================
//! ## Overview
//! Wire-level tests for list/detail extraction and role/user body building.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeMap;
use std::sync::Arc;

use rentroll_ids_core::DecoderConfig;
use rentroll_ids_core::DecoderSettings;
use rentroll_ids_core::Domain;
use rentroll_ids_core::DomainResolvers;
use rentroll_ids_core::NoopAuditSink;
use rentroll_ids_core::OpaqueId;
use rentroll_ids_core::PayloadError;
use rentroll_ids_core::ResolvedId;
use rentroll_ids_core::RoleDraft;
use rentroll_ids_core::TokenDecoder;
use rentroll_ids_core::UserDraft;
use rentroll_ids_core::WireError;
use rentroll_ids_core::build_role_body;
use rentroll_ids_core::build_user_body;
use rentroll_ids_core::extract_ids;
use rentroll_ids_core::extract_references;
use serde_json::json;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

fn resolvers() -> DomainResolvers {
    let settings = DecoderSettings {
        base_secret: "s3cr3t".to_string(),
        domain_secrets: BTreeMap::new(),
        min_length: 6,
        alphabet: None,
        report_ambiguous: true,
    };
    DomainResolvers::from_settings(&settings, Arc::new(NoopAuditSink))
}

fn token(id: u64, min_length: usize) -> String {
    let config = DecoderConfig::new("s3cr3t", min_length, None);
    let id = ResolvedId::from_raw(id).unwrap();
    TokenDecoder::new().encode(id, &config).unwrap()
}

fn texts(ids: &[OpaqueId]) -> Vec<&str> {
    ids.iter().map(OpaqueId::as_str).collect()
}

// ============================================================================
// SECTION: Extraction
// ============================================================================

#[test]
fn list_ids_accept_arrays_and_envelopes() {
    let bare = json!([{ "id": "abc123" }, { "id": 7 }, "12", 40]);
    assert_eq!(texts(&extract_ids(&bare).unwrap()), vec!["abc123", "7", "12", "40"]);

    let wrapped = json!({ "data": [{ "id": "x9", "name": "North" }], "total": 1 });
    assert_eq!(texts(&extract_ids(&wrapped).unwrap()), vec!["x9"]);
}

#[test]
fn list_ids_reject_unsupported_shapes() {
    for response in [
        json!("nope"),
        json!({ "items": [] }),
        json!([{ "name": "no id" }]),
        json!([-3]),
        json!([true]),
        json!([{ "id": { "nested": 1 } }]),
    ] {
        let error = extract_ids(&response).unwrap_err();
        assert!(matches!(error, WireError::Shape(_)), "{response}");
    }
}

#[test]
fn detail_references_tolerate_missing_fields() {
    let detail = json!({
        "id": "r1",
        "permissions": [{ "id": "p1" }, "p2"],
        "offices": null,
    });
    assert_eq!(texts(&extract_references(&detail, "permissions").unwrap()), vec!["p1", "p2"]);
    assert!(extract_references(&detail, "offices").unwrap().is_empty());
    assert!(extract_references(&detail, "roles").unwrap().is_empty());

    let broken = json!({ "permissions": "p1" });
    assert!(extract_references(&broken, "permissions").is_err());
}

// ============================================================================
// SECTION: Role Bodies
// ============================================================================

#[test]
fn role_body_carries_integer_permissions() {
    let resolvers = resolvers();
    let draft: RoleDraft = serde_json::from_value(json!({
        "name": "Leasing",
        "permissions": [token(30, 6), "4", token(30, 10)],
    }))
    .unwrap();

    let body = build_role_body(&draft, &resolvers).unwrap();
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({ "name": "Leasing", "permissions": [30, 4] })
    );
}

#[test]
fn role_body_keeps_description() {
    let resolvers = resolvers();
    let draft: RoleDraft = serde_json::from_value(json!({
        "name": "Audit",
        "description": "read only",
    }))
    .unwrap();

    let body = build_role_body(&draft, &resolvers).unwrap();
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({ "name": "Audit", "description": "read only", "permissions": [] })
    );
}

#[test]
fn role_body_fails_on_unresolved_permission() {
    let resolvers = resolvers();
    let draft: RoleDraft = serde_json::from_value(json!({
        "name": "Leasing",
        "permissions": ["4", "~bad~"],
    }))
    .unwrap();

    let error = build_role_body(&draft, &resolvers).unwrap_err();
    assert_eq!(error.to_string(), "unable to resolve permissions id '~bad~'");
    match error {
        PayloadError::Decode(failure) => assert_eq!(failure.domain, Domain::Permissions),
        PayloadError::Invalid(message) => panic!("unexpected invalid draft: {message}"),
    }
}

// ============================================================================
// SECTION: User Bodies
// ============================================================================

#[test]
fn user_body_derives_role_id_and_office_refs() {
    let resolvers = resolvers();
    let draft: UserDraft = serde_json::from_value(json!({
        "email": "kim@example.com",
        "active": true,
        "role": token(3, 6),
        "offices": [token(5, 6), "5", 9],
    }))
    .unwrap();

    let body = build_user_body(&draft, &resolvers).unwrap();
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({
            "email": "kim@example.com",
            "active": true,
            "role_id": 3,
            "offices": [{ "id": 5 }, { "id": 9 }],
        })
    );
}

#[test]
fn user_draft_may_not_set_role_id() {
    let resolvers = resolvers();
    let draft: UserDraft = serde_json::from_value(json!({
        "role_id": 1,
        "role": "3",
    }))
    .unwrap();

    let error = build_user_body(&draft, &resolvers).unwrap_err();
    assert!(matches!(error, PayloadError::Invalid(_)));
}

#[test]
fn user_body_fails_on_unresolved_role() {
    let resolvers = resolvers();
    let draft: UserDraft = serde_json::from_value(json!({
        "role": "~nope~",
        "offices": ["1"],
    }))
    .unwrap();

    let error = build_user_body(&draft, &resolvers).unwrap_err();
    assert_eq!(error.to_string(), "unable to resolve roles id '~nope~'");
}
