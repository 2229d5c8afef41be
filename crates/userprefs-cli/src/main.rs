//! `userprefs` — inspect browser preference files.
//!
//! # Usage
//!
//! ```text
//! userprefs [OPTIONS] <COMMAND>
//!
//! Commands:
//!   show  <FILE>        Print every preference in declaration order
//!   get   <FILE> <KEY>  Print the value of one preference
//!   check <FILE>        Report every malformed line
//!   fmt   <FILE>        Print the canonical rendering of the file
//!
//! Options:
//!   --config <PATH>     Config file [env: USERPREFS_CONFIG]
//!   --format <FORMAT>   text | json | toml [env: USERPREFS_FORMAT]
//!   --lenient           Skip malformed lines instead of failing
//! ```
//!
//! Flags take precedence over the config file, which takes precedence over
//! built-in defaults.  Logs go to stderr; `RUST_LOG` overrides the configured
//! level.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use userprefs_core::ErrorPolicy;

use userprefs_cli::commands::{execute, Command, Outcome, Settings};
use userprefs_cli::config::{load_config, load_config_from, CliConfig};
use userprefs_cli::output::OutputFormat;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Inspect and normalise browser preference files (user.js / prefs.js).
#[derive(Debug, Parser)]
#[command(name = "userprefs", version)]
struct Cli {
    /// Path to a config file.  Defaults to the platform config directory.
    #[arg(long, global = true, env = "USERPREFS_CONFIG")]
    config: Option<PathBuf>,

    /// Output format.  Defaults to `[output] format` from the config file.
    #[arg(long, global = true, value_enum, env = "USERPREFS_FORMAT")]
    format: Option<OutputFormat>,

    /// Skip malformed lines instead of failing on the first one.
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    /// Merges the parsed flags over `config`.
    fn settings(&self, config: &CliConfig) -> Settings {
        let policy = if self.lenient || config.loader.lenient {
            ErrorPolicy::SkipInvalid
        } else {
            ErrorPolicy::Strict
        };
        Settings {
            format: self.format.unwrap_or(config.output.format),
            policy,
        }
    }

    fn load_config(&self) -> anyhow::Result<CliConfig> {
        match &self.config {
            Some(path) => load_config_from(path)
                .with_context(|| format!("failed to load config {}", path.display())),
            None => load_config().context("failed to load config"),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // `RUST_LOG` wins; otherwise use the configured level.  Logs go to stderr
    // so they never mix with command output.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let settings = cli.settings(&config);
    debug!(?settings, command = ?cli.command, "starting");

    let stdout = io::stdout();
    let stderr = io::stderr();
    let outcome = execute(
        &cli.command,
        &settings,
        &mut stdout.lock(),
        &mut stderr.lock(),
    )?;
    io::stdout().flush()?;

    Ok(match outcome {
        Outcome::Success => ExitCode::SUCCESS,
        Outcome::Failure => ExitCode::FAILURE,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
