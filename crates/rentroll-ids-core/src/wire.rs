// crates/rentroll-ids-core/src/wire.rs
// ============================================================================
// Module: Wire Payloads
// Description: Id extraction from API responses and integer-only write bodies.
// Purpose: Keep opaque ids on the inbound side and plain integers on the outbound side.
// Dependencies: serde, serde_json, crate::{core, runtime}
// ============================================================================

//! ## Overview
//! Inbound list and detail responses carry ids as decimal strings, encoded
//! tokens, bare integers, or nested objects with an `id` field. The helpers
//! here flatten those shapes into [`OpaqueId`] lists.
//!
//! Outbound bodies are built from drafts holding opaque selections. Building
//! is all-or-nothing: any unresolved id aborts before a body value exists, so
//! a partially numericized body cannot be sent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::core::Domain;
use crate::core::OpaqueId;
use crate::core::PayloadError;
use crate::core::ResolvedId;
use crate::core::WireError;
use crate::runtime::DomainResolvers;
use crate::runtime::SelectionSet;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Envelope key wrapping list responses.
const LIST_ENVELOPE_KEY: &str = "data";
/// Field carrying an entity id inside nested objects.
const ID_FIELD: &str = "id";
/// Draft field that the body builder derives from the role selection.
const DERIVED_ROLE_FIELD: &str = "role_id";

// ============================================================================
// SECTION: Inbound
// ============================================================================

/// Extracts entity ids from a list response.
///
/// Accepts a bare array or an object with a `data` array. Elements may be
/// objects with an `id`, strings, or non-negative integers.
///
/// # Errors
///
/// Returns [`WireError::Shape`] when the response or an element has an
/// unsupported shape.
pub fn extract_ids(response: &Value) -> Result<Vec<OpaqueId>, WireError> {
    let items = match response {
        Value::Array(items) => items,
        Value::Object(map) => {
            map.get(LIST_ENVELOPE_KEY).and_then(Value::as_array).ok_or_else(|| {
                WireError::Shape(format!(
                    "list response object must carry a '{LIST_ENVELOPE_KEY}' array"
                ))
            })?
        }
        _ => return Err(WireError::Shape("list response must be an array or object".to_string())),
    };
    items.iter().map(opaque_from_value).collect()
}

/// Extracts the ids referenced by `detail[field]`.
///
/// A missing or null field yields an empty list.
///
/// # Errors
///
/// Returns [`WireError::Shape`] when the field is not an array or an element
/// has an unsupported shape.
pub fn extract_references(detail: &Value, field: &str) -> Result<Vec<OpaqueId>, WireError> {
    match detail.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items.iter().map(opaque_from_value).collect(),
        Some(_) => Err(WireError::Shape(format!("field '{field}' must be an array"))),
    }
}

/// Reads one id from a string, integer, or object carrying `id`.
fn opaque_from_value(value: &Value) -> Result<OpaqueId, WireError> {
    match value {
        Value::Object(map) => match map.get(ID_FIELD) {
            Some(inner) if inner.is_string() || inner.is_number() => scalar_id(inner),
            _ => Err(WireError::Shape(format!(
                "object reference must carry a scalar '{ID_FIELD}'"
            ))),
        },
        other => scalar_id(other),
    }
}

/// Reads a scalar id.
fn scalar_id(value: &Value) -> Result<OpaqueId, WireError> {
    match value {
        Value::String(text) => Ok(OpaqueId::new(text.clone())),
        Value::Number(number) => {
            number.as_u64().map(|raw| OpaqueId::new(raw.to_string())).ok_or_else(|| {
                WireError::Shape(format!("numeric id must be a non-negative integer: {number}"))
            })
        }
        _ => Err(WireError::Shape("id must be a string or integer".to_string())),
    }
}

// ============================================================================
// SECTION: Role Bodies
// ============================================================================

/// Role create/update form state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleDraft {
    /// Role name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Selected permissions.
    #[serde(default)]
    pub permissions: SelectionSet,
}

/// Role write request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleWriteBody {
    /// Role name.
    pub name: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Permission ids.
    pub permissions: Vec<ResolvedId>,
}

/// Builds a role write body.
///
/// # Errors
///
/// Returns [`PayloadError::Decode`] for the first unresolved permission.
pub fn build_role_body(
    draft: &RoleDraft,
    resolvers: &DomainResolvers,
) -> Result<RoleWriteBody, PayloadError> {
    let permissions = resolvers.numericizer(Domain::Permissions).to_integers(&draft.permissions)?;
    Ok(RoleWriteBody {
        name: draft.name.clone(),
        description: draft.description.clone(),
        permissions,
    })
}

// ============================================================================
// SECTION: User Bodies
// ============================================================================

/// User create/update form state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserDraft {
    /// Business fields passed through untouched.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// Assigned role.
    pub role: OpaqueId,
    /// Attached offices.
    #[serde(default)]
    pub offices: SelectionSet,
}

/// Office reference inside a user body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OfficeRef {
    /// Office id.
    pub id: ResolvedId,
}

/// User write request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserWriteBody {
    /// Business fields from the draft.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// Role id.
    pub role_id: ResolvedId,
    /// Office references.
    pub offices: Vec<OfficeRef>,
}

/// Builds a user write body.
///
/// # Errors
///
/// Returns [`PayloadError::Invalid`] when the draft sets `role_id` directly,
/// or [`PayloadError::Decode`] for the first unresolved role or office.
pub fn build_user_body(
    draft: &UserDraft,
    resolvers: &DomainResolvers,
) -> Result<UserWriteBody, PayloadError> {
    if draft.fields.contains_key(DERIVED_ROLE_FIELD) {
        return Err(PayloadError::Invalid(format!(
            "field '{DERIVED_ROLE_FIELD}' is derived and must not be set"
        )));
    }
    let role_id = resolvers.numericizer(Domain::Roles).to_integer(&draft.role)?;
    let offices = resolvers
        .numericizer(Domain::Offices)
        .to_integers(&draft.offices)?
        .into_iter()
        .map(|id| OfficeRef {
            id,
        })
        .collect();
    Ok(UserWriteBody {
        fields: draft.fields.clone(),
        role_id,
        offices,
    })
}
