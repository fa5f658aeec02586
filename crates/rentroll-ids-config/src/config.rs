// crates/rentroll-ids-config/src/config.rs
// ============================================================================
// Module: Rentroll Ids Configuration
// Description: Configuration loading and validation for id resolution.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: rentroll-ids-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Unknown keys and invalid values fail closed. When no file is named and the
//! default file is absent, built-in defaults apply.
//!
//! Environment overrides are read through a caller-supplied lookup so that
//! tests never touch the process environment.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use rentroll_ids_core::DecoderSettings;
use rentroll_ids_core::Domain;
use rentroll_ids_core::FileAuditSink;
use rentroll_ids_core::NoopAuditSink;
use rentroll_ids_core::ResolutionAuditSink;
use rentroll_ids_core::StderrAuditSink;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "rentroll-ids.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "RENTROLL_IDS_CONFIG";
/// Environment variable overriding the base secret.
pub const BASE_SECRET_ENV_VAR: &str = "RENTROLL_IDS_BASE_SECRET";
/// Environment variable overriding the minimum length.
pub const MIN_LENGTH_ENV_VAR: &str = "RENTROLL_IDS_MIN_LENGTH";
/// Environment variable overriding the alphabet.
pub const ALPHABET_ENV_VAR: &str = "RENTROLL_IDS_ALPHABET";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum secret length in bytes.
pub(crate) const MAX_SECRET_LENGTH: usize = 256;
/// Maximum configured minimum length.
pub(crate) const MAX_MIN_LENGTH: usize = 255;
/// Minimum number of distinct alphabet characters.
pub(crate) const MIN_ALPHABET_LENGTH: usize = 16;

/// Returns the environment variable overriding `domain`'s secret.
#[must_use]
pub const fn domain_secret_env_var(domain: Domain) -> &'static str {
    match domain {
        Domain::Permissions => "RENTROLL_IDS_PERMISSIONS_SECRET",
        Domain::Offices => "RENTROLL_IDS_OFFICES_SECRET",
        Domain::Roles => "RENTROLL_IDS_ROLES_SECRET",
    }
}

// ============================================================================
// SECTION: Top-Level Config
// ============================================================================

/// Rentroll Ids configuration loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RentrollIdsConfig {
    /// Decoder key material and search tuning.
    #[serde(default)]
    pub decoder: DecoderConfigSection,
    /// Resolution audit output.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl RentrollIdsConfig {
    /// Loads configuration using the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |key| env::var(key).ok())
    }

    /// Loads configuration, reading environment values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, an override, or validation fails.
    pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match resolve_path(path, &lookup)? {
            Some(resolved) => Self::read(&resolved)?,
            None => Self::default(),
        };
        config.apply_env_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from TOML text without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not a valid config.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Reads and parses a config file.
    fn read(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Applies environment overrides on top of file values.
    ///
    /// Empty override values clear optional settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when an override cannot be parsed.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup(BASE_SECRET_ENV_VAR) {
            self.decoder.base_secret = secret;
        }
        if let Some(raw) = lookup(MIN_LENGTH_ENV_VAR) {
            self.decoder.min_length = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!(
                    "{MIN_LENGTH_ENV_VAR} must be a non-negative integer"
                ))
            })?;
        }
        if let Some(alphabet) = lookup(ALPHABET_ENV_VAR) {
            self.decoder.alphabet = non_empty(alphabet);
        }
        for domain in Domain::ALL {
            if let Some(secret) = lookup(domain_secret_env_var(domain)) {
                self.decoder.domains.get_mut(domain).secret = non_empty(secret);
            }
        }
        Ok(())
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.decoder.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Converts the decoder section into core resolver settings.
    #[must_use]
    pub fn decoder_settings(&self) -> DecoderSettings {
        let domain_secrets: BTreeMap<Domain, String> = Domain::ALL
            .into_iter()
            .filter_map(|domain| {
                self.decoder.domains.get(domain).secret.clone().map(|secret| (domain, secret))
            })
            .collect();
        DecoderSettings {
            base_secret: self.decoder.base_secret.clone(),
            domain_secrets,
            min_length: self.decoder.min_length,
            alphabet: self.decoder.alphabet.clone(),
            report_ambiguous: self.decoder.report_ambiguous,
        }
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the audit file cannot be opened.
    pub fn build_audit_sink(&self) -> Result<Arc<dyn ResolutionAuditSink>, ConfigError> {
        match self.audit.sink {
            AuditSinkKind::Disabled => Ok(Arc::new(NoopAuditSink)),
            AuditSinkKind::Stderr => Ok(Arc::new(StderrAuditSink)),
            AuditSinkKind::File => {
                let path = self.audit.path.as_deref().ok_or_else(|| {
                    ConfigError::Invalid("audit.path is required for the file sink".to_string())
                })?;
                let sink = FileAuditSink::new(Path::new(path.trim()))
                    .map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Arc::new(sink))
            }
        }
    }
}

// ============================================================================
// SECTION: Decoder Config
// ============================================================================

/// Decoder key material and search tuning.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecoderConfigSection {
    /// Primary secret; empty disables decoding.
    #[serde(default)]
    pub base_secret: String,
    /// Configured minimum padded token length.
    #[serde(default)]
    pub min_length: usize,
    /// Optional alphabet override for every candidate.
    #[serde(default)]
    pub alphabet: Option<String>,
    /// Keep scanning after the first hit to detect ambiguous matches.
    #[serde(default = "default_report_ambiguous")]
    pub report_ambiguous: bool,
    /// Per-domain overrides.
    #[serde(default)]
    pub domains: DomainOverrides,
}

impl Default for DecoderConfigSection {
    fn default() -> Self {
        Self {
            base_secret: String::new(),
            min_length: 0,
            alphabet: None,
            report_ambiguous: default_report_ambiguous(),
            domains: DomainOverrides::default(),
        }
    }
}

impl fmt::Debug for DecoderConfigSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderConfigSection")
            .field("base_secret", &"<redacted>")
            .field("min_length", &self.min_length)
            .field("alphabet", &self.alphabet)
            .field("report_ambiguous", &self.report_ambiguous)
            .field("domains", &self.domains)
            .finish()
    }
}

impl DecoderConfigSection {
    /// Validates decoder settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_secret("decoder.base_secret", &self.base_secret)?;
        if self.min_length > MAX_MIN_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "decoder.min_length must be at most {MAX_MIN_LENGTH}"
            )));
        }
        if let Some(alphabet) = &self.alphabet {
            validate_alphabet(alphabet)?;
        }
        for domain in Domain::ALL {
            if let Some(secret) = &self.domains.get(domain).secret {
                validate_secret(&format!("decoder.domains.{domain}.secret"), secret)?;
            }
        }
        Ok(())
    }
}

/// Per-domain decoder overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainOverrides {
    /// Permissions overrides.
    #[serde(default)]
    pub permissions: DomainOverride,
    /// Offices overrides.
    #[serde(default)]
    pub offices: DomainOverride,
    /// Roles overrides.
    #[serde(default)]
    pub roles: DomainOverride,
}

impl DomainOverrides {
    /// Returns the overrides for `domain`.
    #[must_use]
    pub const fn get(&self, domain: Domain) -> &DomainOverride {
        match domain {
            Domain::Permissions => &self.permissions,
            Domain::Offices => &self.offices,
            Domain::Roles => &self.roles,
        }
    }

    /// Returns mutable overrides for `domain`.
    pub const fn get_mut(&mut self, domain: Domain) -> &mut DomainOverride {
        match domain {
            Domain::Permissions => &mut self.permissions,
            Domain::Offices => &mut self.offices,
            Domain::Roles => &mut self.roles,
        }
    }
}

/// Overrides for one domain.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainOverride {
    /// Secret replacing the base secret for this domain.
    #[serde(default)]
    pub secret: Option<String>,
}

impl fmt::Debug for DomainOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainOverride")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// ============================================================================
// SECTION: Audit Config
// ============================================================================

/// Resolution audit output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Destination for resolution events.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path (JSON lines) for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (&self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (_, Some(path)) => validate_path_string("audit.path", path),
            (_, None) => Ok(()),
        }
    }
}

/// Supported audit destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard events.
    #[default]
    #[serde(rename = "none")]
    Disabled,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default for `decoder.report_ambiguous`.
const fn default_report_ambiguous() -> bool {
    true
}

/// Maps an empty override value to `None`.
fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Resolves the config path from CLI, environment, or the default file.
///
/// Returns `None` when nothing was named and the default file is absent.
fn resolve_path<F>(path: Option<&Path>, lookup: &F) -> Result<Option<PathBuf>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    if let Some(env_path) = lookup(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    let default_path = PathBuf::from(DEFAULT_CONFIG_NAME);
    Ok(default_path.is_file().then_some(default_path))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates secret length. The value itself never appears in the error.
fn validate_secret(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.len() > MAX_SECRET_LENGTH {
        return Err(ConfigError::Invalid(format!(
            "{field} exceeds {MAX_SECRET_LENGTH} bytes"
        )));
    }
    Ok(())
}

/// Validates an alphabet override.
fn validate_alphabet(alphabet: &str) -> Result<(), ConfigError> {
    if alphabet.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(
            "decoder.alphabet must not contain whitespace".to_string(),
        ));
    }
    let unique: BTreeSet<char> = alphabet.chars().collect();
    if unique.len() != alphabet.chars().count() {
        return Err(ConfigError::Invalid(
            "decoder.alphabet must not repeat characters".to_string(),
        ));
    }
    if unique.len() < MIN_ALPHABET_LENGTH {
        return Err(ConfigError::Invalid(format!(
            "decoder.alphabet must have at least {MIN_ALPHABET_LENGTH} characters"
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
