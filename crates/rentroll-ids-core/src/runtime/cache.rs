// crates/rentroll-ids-core/src/runtime/cache.rs
// ============================================================================
// Module: Active Decoder Cache
// Description: Per-domain slot remembering the last successful configuration.
// Purpose: Short-circuit full scans once a working configuration is known.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! One [`ActiveDecoderCache`] belongs to one resolver. It is created empty,
//! filled lazily by the first successful scan, and overwritten by later scans
//! that succeed under a different configuration. It is never invalidated:
//! a stale entry only costs a rescan, because resolvers trust the cached
//! configuration only when it decodes the token at hand.
//!
//! Reads and writes are mutually exclusive. The slot holds a plain value, so
//! a poisoned lock is recovered rather than surfaced.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::core::DecoderConfig;

// ============================================================================
// SECTION: Cache
// ============================================================================

/// Mutable, thread-safe slot for one domain's active configuration.
#[derive(Debug, Default)]
pub struct ActiveDecoderCache {
    /// Last configuration that decoded a token for this domain.
    slot: Mutex<Option<DecoderConfig>>,
}

impl ActiveDecoderCache {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Returns a copy of the cached configuration.
    #[must_use]
    pub fn get(&self) -> Option<DecoderConfig> {
        self.lock().clone()
    }

    /// Stores `config`, returning true when the slot changed.
    pub fn promote(&self, config: &DecoderConfig) -> bool {
        let mut guard = self.lock();
        if guard.as_ref() == Some(config) {
            return false;
        }
        *guard = Some(config.clone());
        drop(guard);
        true
    }

    /// Returns true when no configuration has been promoted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }

    /// Locks the slot, recovering from poisoning.
    fn lock(&self) -> MutexGuard<'_, Option<DecoderConfig>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
