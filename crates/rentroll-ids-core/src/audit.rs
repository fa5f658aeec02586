// crates/rentroll-ids-core/src/audit.rs
// ============================================================================
// Module: Resolution Audit Logging
// Description: Structured audit events for id resolution.
// Purpose: Emit JSON-line resolution logs without a logging framework dependency.
// Dependencies: serde, serde_json, crate::core
// ============================================================================

//! ## Overview
//! Resolvers report three noteworthy transitions: a configuration promoted
//! into the active cache, a token that no candidate could decode, and a token
//! that more than one candidate would have decoded. Events identify a
//! configuration only by its position in the candidate space and its minimum
//! length; secrets never reach a sink.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::Domain;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Kind of resolution event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionEventKind {
    /// A scan succeeded under a configuration that differs from the cache.
    CachePromoted,
    /// No candidate decoded the token.
    DecodeFailure,
    /// More than one candidate decoded the token; the first one was used.
    AmbiguousMatch,
}

/// Resolution audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Domain the resolution ran in.
    pub domain: Domain,
    /// Event kind.
    pub kind: ResolutionEventKind,
    /// Token being resolved.
    pub token: String,
    /// Index of the accepted candidate, when one was accepted.
    pub candidate_index: Option<usize>,
    /// Minimum length of the accepted candidate.
    pub min_length: Option<usize>,
    /// Resolved id, when one was accepted.
    pub resolved_id: Option<u64>,
    /// Number of additional candidates that also decoded the token.
    pub alternatives: Option<usize>,
    /// Whether any alternative decoded to a different id.
    pub conflicting: Option<bool>,
}

/// Inputs required to construct a resolution audit event.
pub struct ResolutionAuditEventParams {
    /// Domain the resolution ran in.
    pub domain: Domain,
    /// Event kind.
    pub kind: ResolutionEventKind,
    /// Token being resolved.
    pub token: String,
    /// Index of the accepted candidate.
    pub candidate_index: Option<usize>,
    /// Minimum length of the accepted candidate.
    pub min_length: Option<usize>,
    /// Resolved id.
    pub resolved_id: Option<u64>,
    /// Number of additional decoding candidates.
    pub alternatives: Option<usize>,
    /// Whether any alternative disagreed.
    pub conflicting: Option<bool>,
}

impl ResolutionAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: ResolutionAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "id_resolution",
            timestamp_ms,
            domain: params.domain,
            kind: params.kind,
            token: params.token,
            candidate_index: params.candidate_index,
            min_length: params.min_length,
            resolved_id: params.resolved_id,
            alternatives: params.alternatives,
            conflicting: params.conflicting,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for resolution events.
pub trait ResolutionAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &ResolutionAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ResolutionAuditSink for StderrAuditSink {
    fn record(&self, event: &ResolutionAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ResolutionAuditSink for FileAuditSink {
    fn record(&self, event: &ResolutionAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Audit sink that keeps events in memory, for tests and inspection.
#[derive(Default)]
pub struct InMemoryAuditSink {
    /// Recorded events in arrival order.
    events: Mutex<Vec<ResolutionAuditEvent>>,
}

impl InMemoryAuditSink {
    /// Creates an empty in-memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<ResolutionAuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Returns recorded events of one kind.
    #[must_use]
    pub fn events_of(&self, kind: ResolutionEventKind) -> Vec<ResolutionAuditEvent> {
        self.events().into_iter().filter(|event| event.kind == kind).collect()
    }
}

impl ResolutionAuditSink for InMemoryAuditSink {
    fn record(&self, event: &ResolutionAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl ResolutionAuditSink for NoopAuditSink {
    fn record(&self, _event: &ResolutionAuditEvent) {}
}
