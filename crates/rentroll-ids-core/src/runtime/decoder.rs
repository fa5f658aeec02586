// crates/rentroll-ids-core/src/runtime/decoder.rs
// ============================================================================
// Module: Token Decoder
// Description: Single-candidate decoding of opaque tokens.
// Purpose: Recover a positive id from a token under one guessed configuration.
// Dependencies: harsh, crate::core
// ============================================================================

//! ## Overview
//! Tokens are produced by a salted, reversible hashids encoding. Decoding a
//! token under one [`DecoderConfig`] tries two shapes in fixed order:
//!
//! 1. the integer-sequence form, taking the first decoded integer;
//! 2. the hex-string form, parsing the decoded hex as an integer.
//!
//! A shape only matches when its result re-encodes to the exact input token,
//! which keeps a wrong salt from "decoding" arbitrary strings. Not matching is
//! the common case during a scan and is reported as [`DecodeOutcome::NoMatch`],
//! never as an error.
//!
//! Only the sequence form is ever produced by [`TokenDecoder::encode`]. A
//! hashids hex token is itself a valid sequence token for a different integer,
//! so emitting one would resolve to the wrong entity.
//!
//! [`PreparedDecoder`] holds the codec for one configuration so a resolver
//! can reuse it across calls instead of rebuilding it per attempt.

// ============================================================================
// SECTION: Imports
// ============================================================================

use harsh::Harsh;
use harsh::HarshBuilder;

use crate::core::DecoderConfig;
use crate::core::ResolvedId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum token length accepted for decoding, in bytes.
pub const MAX_TOKEN_BYTES: usize = 256;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Token shape that produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeShape {
    /// Integer-sequence form (first integer taken).
    Sequence,
    /// Hex-string form.
    Hex,
}

impl DecodeShape {
    /// Returns a stable label for the shape.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sequence => "sequence",
            Self::Hex => "hex",
        }
    }
}

/// Result of decoding one token under one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The token decoded to a positive id.
    Success {
        /// Decoded id.
        id: ResolvedId,
        /// Shape that matched.
        shape: DecodeShape,
    },
    /// Neither shape produced a positive id.
    NoMatch,
}

impl DecodeOutcome {
    /// Returns the decoded id on success.
    #[must_use]
    pub const fn resolved(self) -> Option<ResolvedId> {
        match self {
            Self::Success {
                id, ..
            } => Some(id),
            Self::NoMatch => None,
        }
    }

    /// Returns true when the token decoded.
    #[must_use]
    pub const fn is_match(self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

// ============================================================================
// SECTION: Codec Seam
// ============================================================================

/// Raw two-shape decoding primitive.
pub(crate) trait TokenCodec {
    /// Decodes the integer-sequence form, `None` when the token does not verify.
    fn decode_sequence(&self, token: &str) -> Option<Vec<u64>>;

    /// Decodes the hex-string form, `None` when the token does not verify.
    fn decode_hex(&self, token: &str) -> Option<String>;
}

/// Hashids codec bound to one configuration.
struct HashidsCodec {
    /// Underlying encoder/decoder.
    inner: Harsh,
}

impl HashidsCodec {
    /// Builds a codec, returning `None` when the configuration is unusable
    /// (for example an alphabet the scheme rejects).
    fn from_config(config: &DecoderConfig) -> Option<Self> {
        let mut builder = HarshBuilder::new().salt(config.secret()).length(config.min_length());
        if let Some(alphabet) = config.alphabet() {
            builder = builder.alphabet(alphabet);
        }
        builder.build().ok().map(|inner| Self {
            inner,
        })
    }
}

impl TokenCodec for HashidsCodec {
    fn decode_sequence(&self, token: &str) -> Option<Vec<u64>> {
        let values = self.inner.decode(token).ok()?;
        if values.is_empty() || self.inner.encode(&values) != token {
            return None;
        }
        Some(values)
    }

    fn decode_hex(&self, token: &str) -> Option<String> {
        let hex = self.inner.decode_hex(token).ok()?;
        let reencoded = self.inner.encode_hex(&hex).ok()?;
        (reencoded == token).then_some(hex)
    }
}

/// Applies the fixed shape order against a codec.
pub(crate) fn decode_with(codec: &impl TokenCodec, token: &str) -> DecodeOutcome {
    let sequence = codec
        .decode_sequence(token)
        .and_then(|values| values.first().copied())
        .and_then(ResolvedId::from_raw);
    if let Some(id) = sequence {
        return DecodeOutcome::Success {
            id,
            shape: DecodeShape::Sequence,
        };
    }
    let hex = codec
        .decode_hex(token)
        .filter(|hex| !hex.is_empty() && hex.bytes().all(|byte| byte.is_ascii_hexdigit()))
        .and_then(|hex| u64::from_str_radix(&hex, 16).ok())
        .and_then(ResolvedId::from_raw);
    match hex {
        Some(id) => DecodeOutcome::Success {
            id,
            shape: DecodeShape::Hex,
        },
        None => DecodeOutcome::NoMatch,
    }
}

// ============================================================================
// SECTION: Prepared Decoder
// ============================================================================

/// Codec built once for one configuration.
///
/// # Invariants
/// - Decoding and encoding behave exactly like [`TokenDecoder`] with the same
///   configuration.
pub struct PreparedDecoder {
    /// Codec, absent when the configuration is unusable.
    codec: Option<HashidsCodec>,
}

impl PreparedDecoder {
    /// Builds the codec for `config`.
    #[must_use]
    pub fn new(config: &DecoderConfig) -> Self {
        Self {
            codec: HashidsCodec::from_config(config),
        }
    }

    /// Returns true when the configuration produced a usable codec.
    #[must_use]
    pub const fn is_usable(&self) -> bool {
        self.codec.is_some()
    }

    /// Decodes `token`.
    #[must_use]
    pub fn decode(&self, token: &str) -> DecodeOutcome {
        if token.is_empty() || token.len() > MAX_TOKEN_BYTES {
            return DecodeOutcome::NoMatch;
        }
        match &self.codec {
            Some(codec) => decode_with(codec, token),
            None => DecodeOutcome::NoMatch,
        }
    }

    /// Encodes `id` in the integer-sequence form.
    ///
    /// Returns `None` when the configuration is unusable.
    #[must_use]
    pub fn encode(&self, id: ResolvedId) -> Option<String> {
        self.codec.as_ref().map(|codec| codec.inner.encode(&[id.get()]))
    }
}

// ============================================================================
// SECTION: Decoder
// ============================================================================

/// Stateless decoder for one token under one configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenDecoder;

impl TokenDecoder {
    /// Creates a new decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decodes `token` under `config`.
    #[must_use]
    pub fn decode(&self, token: &str, config: &DecoderConfig) -> DecodeOutcome {
        PreparedDecoder::new(config).decode(token)
    }

    /// Encodes `id` in the integer-sequence form under `config`.
    ///
    /// Returns `None` when the configuration is unusable.
    #[must_use]
    pub fn encode(&self, id: ResolvedId, config: &DecoderConfig) -> Option<String> {
        PreparedDecoder::new(config).encode(id)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
