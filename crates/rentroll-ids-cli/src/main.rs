// crates/rentroll-ids-cli/src/main.rs
// ============================================================================
// Module: Rentroll Ids CLI Entry Point
// Description: Command dispatcher for opaque id resolution workflows.
// Purpose: Resolve, encode, and numericize ids and build write bodies offline.
// Dependencies: clap, rentroll-ids-config, rentroll-ids-core, serde, thiserror.
// ============================================================================

//! ## Overview
//! The `rentroll-ids` CLI exposes the resolver to operators. Every command
//! loads `rentroll-ids.toml` (or the built-in defaults), builds one resolver
//! per domain, and prints a single JSON document on stdout. Failures go to
//! stderr with a non-zero exit code and never produce partial output.
//!
//! Decoder secrets are never printed; candidates are identified by index.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use rentroll_ids_config::RentrollIdsConfig;
use rentroll_ids_core::DecoderConfigSpace;
use rentroll_ids_core::Domain;
use rentroll_ids_core::DomainResolvers;
use rentroll_ids_core::OpaqueId;
use rentroll_ids_core::PreparedDecoder;
use rentroll_ids_core::ResolvedId;
use rentroll_ids_core::RoleDraft;
use rentroll_ids_core::UserDraft;
use rentroll_ids_core::build_role_body;
use rentroll_ids_core::build_user_body;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a JSON draft input.
const MAX_DRAFT_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "rentroll-ids", version, disable_help_subcommand = true)]
struct Cli {
    /// Path to `rentroll-ids.toml` (overrides `RENTROLL_IDS_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve opaque ids to plain ids.
    Resolve(TokensCommand),
    /// Encode plain ids under one candidate configuration.
    Encode(EncodeCommand),
    /// List the ordered candidate configurations of a domain.
    Candidates(DomainCommand),
    /// Convert opaque ids into an integer array for a write body.
    Numericize(TokensCommand),
    /// Build a role write body from a JSON draft.
    RoleBody(DraftCommand),
    /// Build a user write body from a JSON draft.
    UserBody(DraftCommand),
}

/// Domain selector argument.
#[derive(Args, Debug)]
struct DomainCommand {
    /// Identifier domain.
    #[arg(long, value_enum)]
    domain: DomainArg,
}

/// Domain plus opaque ids.
#[derive(Args, Debug)]
struct TokensCommand {
    /// Identifier domain.
    #[arg(long, value_enum)]
    domain: DomainArg,
    /// Opaque ids (tokens or decimal literals).
    #[arg(required = true, value_name = "TOKEN")]
    tokens: Vec<String>,
}

/// Arguments for `encode`.
#[derive(Args, Debug)]
struct EncodeCommand {
    /// Identifier domain.
    #[arg(long, value_enum)]
    domain: DomainArg,
    /// Candidate index within the domain's space.
    #[arg(long, default_value_t = 0)]
    candidate: usize,
    /// Plain ids to encode.
    #[arg(required = true, value_name = "ID")]
    ids: Vec<u64>,
}

/// Arguments for body-building commands.
#[derive(Args, Debug)]
struct DraftCommand {
    /// JSON draft file.
    #[arg(long, value_name = "FILE")]
    input: PathBuf,
}

/// Identifier domains accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum DomainArg {
    /// Permission ids.
    Permissions,
    /// Office ids.
    Offices,
    /// Role ids.
    Roles,
}

impl From<DomainArg> for Domain {
    fn from(value: DomainArg) -> Self {
        match value {
            DomainArg::Permissions => Self::Permissions,
            DomainArg::Offices => Self::Offices,
            DomainArg::Roles => Self::Roles,
        }
    }
}

// ============================================================================
// SECTION: Output Types
// ============================================================================

/// Output of `resolve`.
#[derive(Debug, Serialize)]
struct ResolveReport {
    /// Domain resolved against.
    domain: Domain,
    /// One entry per input token, in input order.
    results: Vec<ResolvedToken>,
}

/// One resolved token.
#[derive(Debug, Serialize)]
struct ResolvedToken {
    /// Token as given.
    token: OpaqueId,
    /// Resolved id.
    id: ResolvedId,
}

/// Output of `encode`.
#[derive(Debug, Serialize)]
struct EncodeReport {
    /// Domain encoded for.
    domain: Domain,
    /// Candidate index used.
    candidate: usize,
    /// Minimum length of that candidate.
    min_length: usize,
    /// Encoded ids, in input order.
    tokens: Vec<EncodedId>,
}

/// One encoded id.
#[derive(Debug, Serialize)]
struct EncodedId {
    /// Plain id.
    id: ResolvedId,
    /// Token under the chosen candidate.
    token: String,
}

/// Output of `candidates`.
#[derive(Debug, Serialize)]
struct CandidateReport {
    /// Domain listed.
    domain: Domain,
    /// Candidates in search order.
    candidates: Vec<CandidateEntry>,
}

/// Secret-free description of one candidate.
#[derive(Debug, Serialize)]
struct CandidateEntry {
    /// Position in the search order.
    index: usize,
    /// Minimum padded length.
    min_length: usize,
    /// Whether an alphabet override applies.
    custom_alphabet: bool,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a printable message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

/// Errors raised by bounded file reads.
#[derive(Debug, Error)]
enum ReadLimitError {
    /// I/O failure while reading.
    #[error("{0}")]
    Io(std::io::Error),
    /// Input exceeded the size limit.
    #[error("input exceeds size limit ({size} > {limit} bytes)")]
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Loads configuration and executes the selected command.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let config = RentrollIdsConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(err.to_string()))?;
    let audit = config.build_audit_sink().map_err(|err| CliError::new(err.to_string()))?;
    let resolvers = DomainResolvers::from_settings(&config.decoder_settings(), audit);

    match cli.command {
        Commands::Resolve(command) => {
            write_json(&resolve_tokens(&resolvers, command.domain.into(), &command.tokens)?)?;
        }
        Commands::Encode(command) => {
            let space = resolvers.get(command.domain.into()).space();
            write_json(&encode_ids(space, command.candidate, &command.ids)?)?;
        }
        Commands::Candidates(command) => {
            write_json(&describe_candidates(resolvers.get(command.domain.into()).space()))?;
        }
        Commands::Numericize(command) => {
            write_json(&numericize_tokens(&resolvers, command.domain.into(), &command.tokens)?)?;
        }
        Commands::RoleBody(command) => {
            let draft: RoleDraft = read_draft(&command.input)?;
            let body =
                build_role_body(&draft, &resolvers).map_err(|err| CliError::new(err.to_string()))?;
            write_json(&body)?;
        }
        Commands::UserBody(command) => {
            let draft: UserDraft = read_draft(&command.input)?;
            let body =
                build_user_body(&draft, &resolvers).map_err(|err| CliError::new(err.to_string()))?;
            write_json(&body)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Resolves every token, stopping at the first failure.
fn resolve_tokens(
    resolvers: &DomainResolvers,
    domain: Domain,
    tokens: &[String],
) -> CliResult<ResolveReport> {
    let resolver = resolvers.get(domain);
    let results = tokens
        .iter()
        .map(|token| {
            let token = OpaqueId::new(token.as_str());
            resolver
                .resolve(&token)
                .map(|id| ResolvedToken {
                    token,
                    id,
                })
                .map_err(|err| CliError::new(err.to_string()))
        })
        .collect::<CliResult<Vec<_>>>()?;
    Ok(ResolveReport {
        domain,
        results,
    })
}

/// Encodes ids under the candidate at `candidate`.
fn encode_ids(
    space: &DecoderConfigSpace,
    candidate: usize,
    ids: &[u64],
) -> CliResult<EncodeReport> {
    let config = space.get(candidate).ok_or_else(|| {
        CliError::new(format!(
            "candidate {candidate} is out of range for {} ({} candidates)",
            space.domain(),
            space.len()
        ))
    })?;
    let decoder = PreparedDecoder::new(config);
    let mut tokens = Vec::with_capacity(ids.len());
    for raw in ids {
        let id = ResolvedId::from_raw(*raw)
            .ok_or_else(|| CliError::new("ids must be positive".to_string()))?;
        let token = decoder.encode(id).ok_or_else(|| {
            CliError::new(format!("candidate {candidate} cannot encode id {id}"))
        })?;
        tokens.push(EncodedId {
            id,
            token,
        });
    }
    Ok(EncodeReport {
        domain: space.domain(),
        candidate,
        min_length: config.min_length(),
        tokens,
    })
}

/// Describes the candidate space without exposing secrets.
fn describe_candidates(space: &DecoderConfigSpace) -> CandidateReport {
    let candidates = space
        .iter()
        .enumerate()
        .map(|(index, config)| CandidateEntry {
            index,
            min_length: config.min_length(),
            custom_alphabet: config.alphabet().is_some(),
        })
        .collect();
    CandidateReport {
        domain: space.domain(),
        candidates,
    }
}

/// Converts tokens into the integer list a write body would carry.
fn numericize_tokens(
    resolvers: &DomainResolvers,
    domain: Domain,
    tokens: &[String],
) -> CliResult<Vec<ResolvedId>> {
    let ids: Vec<OpaqueId> = tokens.iter().map(|token| OpaqueId::new(token.as_str())).collect();
    resolvers
        .numericizer(domain)
        .to_integers(&ids)
        .map_err(|err| CliError::new(err.to_string()))
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Reads and parses a JSON draft.
fn read_draft<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let bytes = read_bytes_with_limit(path, MAX_DRAFT_BYTES).map_err(|err| {
        CliError::new(format!("failed to read draft {}: {err}", path.display()))
    })?;
    parse_draft(&bytes)
        .map_err(|err| CliError::new(format!("invalid draft {}: {err}", path.display())))
}

/// Parses a JSON draft from bytes.
fn parse_draft<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a value as one JSON line on stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let payload = serde_json::to_string(value)
        .map_err(|err| CliError::new(format!("failed to serialize output: {err}")))?;
    write_stdout_line(&payload)
        .map_err(|err| CliError::new(format!("failed to write stdout: {err}")))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
