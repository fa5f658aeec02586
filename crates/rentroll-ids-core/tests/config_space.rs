// crates/rentroll-ids-core/tests/config_space.rs
// ============================================================================
// Module: Decoder Configuration Space Tests
// Description: Ordering, de-duplication, and input handling of candidate spaces.
// Purpose: Pin the search order that breaks ties between candidates.
// ============================================================================
//! ## Overview
//! Candidate space generation tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeMap;

use rentroll_ids_core::DecoderConfig;
use rentroll_ids_core::DecoderConfigSpace;
use rentroll_ids_core::DecoderSettings;
use rentroll_ids_core::Domain;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

fn summary(space: &DecoderConfigSpace) -> Vec<(String, usize)> {
    space.iter().map(|config| (config.secret().to_string(), config.min_length())).collect()
}

// ============================================================================
// SECTION: Candidate Order
// ============================================================================

#[test]
fn secrets_vary_before_lengths_in_listed_order() {
    let space = DecoderConfigSpace::build("s3cr3t", Domain::Permissions, None, 6, None);
    let secrets = [
        "s3cr3t",
        "s3cr3tpermissions",
        "s3cr3t_permissions",
        "s3cr3t:permissions",
        "s3cr3t-permissions",
        "s3cr3t.permissions",
    ];
    let expected: Vec<(String, usize)> = secrets
        .iter()
        .flat_map(|secret| [6, 0, 8, 10].map(|length| ((*secret).to_string(), length)))
        .collect();
    assert_eq!(summary(&space), expected);
    assert_eq!(space.domain(), Domain::Permissions);
}

#[test]
fn configured_length_that_is_also_a_fallback_is_not_repeated() {
    let space = DecoderConfigSpace::build("k", Domain::Offices, None, 8, None);
    let lengths: Vec<usize> =
        space.iter().filter(|config| config.secret() == "k").map(DecoderConfig::min_length).collect();
    assert_eq!(lengths, vec![8, 0, 6, 10]);

    let zero = DecoderConfigSpace::build("k", Domain::Offices, None, 0, None);
    let lengths: Vec<usize> =
        zero.iter().filter(|config| config.secret() == "k").map(DecoderConfig::min_length).collect();
    assert_eq!(lengths, vec![0, 6, 8, 10]);
}

#[test]
fn domain_override_follows_base_secret() {
    let space = DecoderConfigSpace::build("base", Domain::Roles, Some("roles-key"), 0, None);
    let secrets: Vec<&str> = space.iter().map(DecoderConfig::secret).collect();
    assert_eq!(&secrets[0 .. 4], &["base"; 4]);
    assert_eq!(&secrets[4 .. 8], &["roles-key"; 4]);
    assert_eq!(secrets[8], "baseroles");
    assert_eq!(space.len(), 7 * 4);
}

#[test]
fn empty_override_defaults_to_base_secret() {
    let with_empty = DecoderConfigSpace::build("base", Domain::Roles, Some(""), 0, None);
    let without = DecoderConfigSpace::build("base", Domain::Roles, None, 0, None);
    assert_eq!(with_empty, without);
    assert_eq!(without.len(), 6 * 4);
}

#[test]
fn empty_base_secret_yields_empty_space() {
    let space = DecoderConfigSpace::build("", Domain::Permissions, Some("override"), 6, None);
    assert!(space.is_empty());
    assert_eq!(space.len(), 0);
    assert!(space.get(0).is_none());
}

#[test]
fn alphabet_override_applies_to_every_candidate() {
    let alphabet = "abcdefghijklmnopqrstuvwxyz0123456789";
    let space = DecoderConfigSpace::build("k", Domain::Offices, None, 0, Some(alphabet));
    assert!(space.iter().all(|config| config.alphabet() == Some(alphabet)));

    let blank = DecoderConfigSpace::build("k", Domain::Offices, None, 0, Some(""));
    assert!(blank.iter().all(|config| config.alphabet().is_none()));
}

#[test]
fn generation_is_deterministic() {
    let first = DecoderConfigSpace::build("s3cr3t", Domain::Offices, Some("o"), 7, Some("x"));
    let second = DecoderConfigSpace::build("s3cr3t", Domain::Offices, Some("o"), 7, Some("x"));
    assert_eq!(first, second);
    for (index, config) in first.iter().enumerate() {
        assert_eq!(first.position(config), Some(index));
    }
}

#[test]
fn settings_build_per_domain_spaces() {
    let settings = DecoderSettings {
        base_secret: "s3cr3t".to_string(),
        domain_secrets: BTreeMap::from([(Domain::Offices, "office-key".to_string())]),
        min_length: 6,
        alphabet: None,
        report_ambiguous: true,
    };
    let offices = settings.space_for(Domain::Offices);
    let roles = settings.space_for(Domain::Roles);
    assert!(offices.iter().any(|config| config.secret() == "office-key"));
    assert!(!roles.iter().any(|config| config.secret() == "office-key"));
    assert!(roles.iter().any(|config| config.secret() == "s3cr3t:roles"));
}

#[test]
fn debug_output_redacts_secrets() {
    let config = DecoderConfig::new("topsecret", 6, None);
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("topsecret"));
    assert!(rendered.contains("min_length: 6"));
}
