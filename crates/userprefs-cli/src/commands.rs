//! Subcommand implementations.
//!
//! Each command loads one preference file, writes its result to `out` and
//! diagnostics to `err`, and reports whether it succeeded.  Keeping the
//! writers as parameters lets the tests capture output without a terminal.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use tracing::info;
use userprefs_core::{render, ErrorPolicy, LoadOutcome, Loader};

use crate::output::{format_set, format_value, OutputFormat};

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print every preference in declaration order.
    Show {
        /// Preference file (user.js / prefs.js).
        file: PathBuf,
    },
    /// Print the value of one preference.
    Get {
        file: PathBuf,
        /// Dotted preference key, e.g. `browser.uidensity`.
        key: String,
    },
    /// Report every malformed line.  Always loads leniently.
    Check { file: PathBuf },
    /// Print the canonical rendering of the file.
    Fmt { file: PathBuf },
}

/// Settings resolved from CLI flags and the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub format: OutputFormat,
    pub policy: ErrorPolicy,
}

/// Whether the command achieved what was asked.  Maps to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Runs `command`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, if it is malformed under the
/// strict policy, or if writing output fails.
pub fn execute(
    command: &Command,
    settings: &Settings,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<Outcome> {
    match command {
        Command::Show { file } => {
            let loaded = load(file, settings.policy, err)?;
            out.write_all(format_set(&loaded.set, settings.format)?.as_bytes())?;
            Ok(Outcome::Success)
        }
        Command::Get { file, key } => {
            let loaded = load(file, settings.policy, err)?;
            match loaded.set.get(key) {
                Some(value) => {
                    out.write_all(format_value(key, value, settings.format)?.as_bytes())?;
                    Ok(Outcome::Success)
                }
                None => {
                    writeln!(err, "{}: no preference named `{key}`", file.display())?;
                    Ok(Outcome::Failure)
                }
            }
        }
        Command::Check { file } => {
            let loaded = Loader::new()
                .with_policy(ErrorPolicy::SkipInvalid)
                .load_file(file)
                .with_context(|| format!("failed to read {}", file.display()))?;

            for e in &loaded.skipped {
                writeln!(out, "{}:{}: {}", file.display(), e.line, e.reason)?;
            }
            if loaded.skipped.is_empty() {
                writeln!(
                    out,
                    "{}: ok ({} preferences)",
                    file.display(),
                    loaded.set.len()
                )?;
                Ok(Outcome::Success)
            } else {
                info!(
                    invalid = loaded.skipped.len(),
                    "check found malformed lines in {}",
                    file.display()
                );
                Ok(Outcome::Failure)
            }
        }
        Command::Fmt { file } => {
            let loaded = load(file, settings.policy, err)?;
            out.write_all(render(&loaded.set).as_bytes())?;
            Ok(Outcome::Success)
        }
    }
}

/// Loads `file` with `policy`, printing a note to `err` for each skipped line.
fn load(file: &Path, policy: ErrorPolicy, err: &mut dyn Write) -> anyhow::Result<LoadOutcome> {
    let loaded = Loader::new()
        .with_policy(policy)
        .load_file(file)
        .with_context(|| format!("failed to load {}", file.display()))?;

    for e in &loaded.skipped {
        writeln!(err, "{}:{}: skipped: {}", file.display(), e.line, e.reason)?;
    }
    Ok(loaded)
}
