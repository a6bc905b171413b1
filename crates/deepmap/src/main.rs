//! Binary entry point for the deepmap CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Double every number in a document
//! deepmap map --input data.json --transform double
//!
//! # Redact secrets read from stdin
//! cat config.json | deepmap map --transform redact --key password --key token
//!
//! # Count containers and leaves
//! deepmap stats --input data.json
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use deepmap::cli::{run_map, run_stats};
use deepmap::error::{DeepmapError, OutputErrorCode};
use deepmap::output::{emit_response, emit_response_compact, ErrorResponse};
use deepmap::transform::{TransformKind, TransformSpec};

// ============================================================================
// CLI Structure
// ============================================================================

/// Structural deep transforms over JSON documents.
///
/// All output is JSON on stdout; logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "deepmap", version, about = "Structural deep transforms over JSON documents")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level (overridden by RUST_LOG).
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply a built-in transform to every leaf of a document.
    Map {
        /// Input file (default: stdin).
        #[arg(long)]
        input: Option<PathBuf>,
        /// Transform to apply.
        #[arg(long, value_enum)]
        transform: TransformArg,
        /// Key name to redact (repeatable, required for `redact`).
        #[arg(long = "key")]
        keys: Vec<String>,
        /// Emit single-line JSON.
        #[arg(long)]
        compact: bool,
    },
    /// Report container and leaf counts for a document.
    Stats {
        /// Input file (default: stdin).
        #[arg(long)]
        input: Option<PathBuf>,
        /// Emit single-line JSON.
        #[arg(long)]
        compact: bool,
    },
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Transform selector for the `map` command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TransformArg {
    /// Return every value unchanged.
    Identity,
    /// Multiply numbers by two.
    Double,
    /// Upper-case text.
    Upper,
    /// Replace members named by --key with "[REDACTED]".
    Redact,
}

impl From<TransformArg> for TransformKind {
    fn from(arg: TransformArg) -> Self {
        match arg {
            TransformArg::Identity => TransformKind::Identity,
            TransformArg::Double => TransformKind::Double,
            TransformArg::Upper => TransformKind::Upper,
            TransformArg::Redact => TransformKind::Redact,
        }
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON, same as successful responses.
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), DeepmapError> {
    match cli.command {
        Command::Map {
            input,
            transform,
            keys,
            compact,
        } => {
            let spec = TransformSpec::new(transform.into(), keys)?;
            let response = run_map(input.as_deref(), &spec)?;
            write_output(&response, compact)
        }
        Command::Stats { input, compact } => {
            let response = run_stats(input.as_deref())?;
            write_output(&response, compact)
        }
    }
}

fn write_output<T: serde::Serialize>(response: &T, compact: bool) -> Result<(), DeepmapError> {
    let mut stdout = io::stdout();
    if compact {
        emit_response_compact(response, &mut stdout)?;
    } else {
        emit_response(response, &mut stdout)?;
    }
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod cli_parsing {
        use super::*;

        #[test]
        fn map_with_repeated_keys() {
            let args = [
                "deepmap",
                "map",
                "--input",
                "data.json",
                "--transform",
                "redact",
                "--key",
                "password",
                "--key",
                "token",
            ];
            let cli = Cli::try_parse_from(args).unwrap();
            match cli.command {
                Command::Map {
                    input,
                    transform,
                    keys,
                    compact,
                } => {
                    assert_eq!(input, Some(PathBuf::from("data.json")));
                    assert_eq!(transform, TransformArg::Redact);
                    assert_eq!(keys, vec!["password", "token"]);
                    assert!(!compact);
                }
                _ => panic!("expected Map"),
            }
        }

        #[test]
        fn map_requires_transform() {
            assert!(Cli::try_parse_from(["deepmap", "map"]).is_err());
        }

        #[test]
        fn map_rejects_unknown_transform() {
            assert!(Cli::try_parse_from(["deepmap", "map", "--transform", "triple"]).is_err());
        }

        #[test]
        fn stats_defaults_to_stdin() {
            let cli = Cli::try_parse_from(["deepmap", "stats", "--compact"]).unwrap();
            match cli.command {
                Command::Stats { input, compact } => {
                    assert!(input.is_none());
                    assert!(compact);
                }
                _ => panic!("expected Stats"),
            }
        }

        #[test]
        fn log_level_is_global() {
            let cli = Cli::try_parse_from(["deepmap", "stats", "--log-level", "debug"]).unwrap();
            assert!(matches!(cli.global.log_level, LogLevel::Debug));
        }

        #[test]
        fn log_level_defaults_to_warn() {
            let cli = Cli::try_parse_from(["deepmap", "stats"]).unwrap();
            assert!(matches!(cli.global.log_level, LogLevel::Warn));
        }
    }

    mod log_level {
        use super::*;

        #[test]
        fn maps_to_tracing_levels() {
            assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
            assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
        }
    }

    #[test]
    fn transform_arg_converts_to_kind() {
        assert_eq!(TransformKind::from(TransformArg::Upper), TransformKind::Upper);
        assert_eq!(TransformKind::from(TransformArg::Identity).name(), "identity");
    }
}
