//! Loading a whole preference source into a [`PreferenceSet`].
//!
//! The loader walks the source line by line through a
//! [`Parser`](crate::pref::parser::Parser) and collects declarations.  What
//! happens on a malformed line is the caller's decision, expressed as an
//! [`ErrorPolicy`]:
//!
//! - [`ErrorPolicy::Strict`] (default) aborts on the first [`ParseError`].
//! - [`ErrorPolicy::SkipInvalid`] drops the line, logs a warning, records the
//!   error in [`LoadOutcome::skipped`] and keeps going.
//!
//! Loading is synchronous and reads the source exactly once.

pub mod source;

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use crate::pref::parser::{ParseError, Parser};
use crate::pref::set::PreferenceSet;

pub use source::{FileSource, PrefSource};

/// Error type for loading from a [`PrefSource`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source could not be read.
    #[error("I/O error reading preferences from {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: io::Error,
    },

    /// The text was read but a line was malformed (strict policy only).
    #[error("failed to parse preferences: {0}")]
    Parse(#[from] ParseError),
}

/// How the loader reacts to a malformed line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Abort the load on the first malformed line.
    #[default]
    Strict,
    /// Skip malformed lines and keep loading.
    SkipInvalid,
}

/// Result of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub set: PreferenceSet,
    /// Lines dropped under [`ErrorPolicy::SkipInvalid`], in source order.
    /// Always empty under [`ErrorPolicy::Strict`].
    pub skipped: Vec<ParseError>,
}

/// Configurable one-shot loader.
///
/// # Examples
///
/// ```rust
/// use userprefs_core::{ErrorPolicy, Loader};
///
/// let src = "user_pref(\"a\", 1);\nuser_pref(\"b\", oops);\nuser_pref(\"c\", 3);\n";
///
/// assert!(Loader::new().load_str(src).is_err());
///
/// let outcome = Loader::new()
///     .with_policy(ErrorPolicy::SkipInvalid)
///     .load_str(src)
///     .unwrap();
/// assert_eq!(outcome.set.len(), 2);
/// assert_eq!(outcome.skipped[0].line, 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Loader {
    policy: ErrorPolicy,
}

impl Loader {
    /// Creates a strict loader.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Loads preferences from in-memory text.
    ///
    /// A leading UTF-8 byte-order mark is ignored.
    ///
    /// # Errors
    ///
    /// Under [`ErrorPolicy::Strict`], returns the first [`ParseError`].
    /// Under [`ErrorPolicy::SkipInvalid`], never fails.
    pub fn load_str(&self, src: &str) -> Result<LoadOutcome, ParseError> {
        let src = src.strip_prefix('\u{feff}').unwrap_or(src);

        let mut parser = Parser::new();
        let mut declarations = Vec::new();
        let mut skipped = Vec::new();

        for (idx, text) in src.lines().enumerate() {
            match parser.parse_line(idx + 1, text) {
                Ok(Some(decl)) => declarations.push(decl),
                Ok(None) => {}
                Err(e) => self.handle(e, &mut skipped)?,
            }
        }
        if let Err(e) = parser.finish() {
            self.handle(e, &mut skipped)?;
        }

        let set: PreferenceSet = declarations.into_iter().collect();
        debug!(
            preferences = set.len(),
            skipped = skipped.len(),
            "preference set loaded"
        );
        Ok(LoadOutcome { set, skipped })
    }

    /// Reads `source` once and loads it.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the source cannot be read and
    /// [`LoadError::Parse`] under the strict policy.
    pub fn load(&self, source: &dyn PrefSource) -> Result<LoadOutcome, LoadError> {
        let origin = source.describe();
        let text = source
            .read_to_string()
            .map_err(|e| LoadError::Io { origin: origin.clone(), source: e })?;

        debug!("loading preferences from {origin}");
        Ok(self.load_str(&text)?)
    }

    /// Convenience wrapper around [`Loader::load`] with a [`FileSource`].
    ///
    /// # Errors
    ///
    /// See [`Loader::load`].
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<LoadOutcome, LoadError> {
        self.load(&FileSource::new(path))
    }

    fn handle(&self, e: ParseError, skipped: &mut Vec<ParseError>) -> Result<(), ParseError> {
        match self.policy {
            ErrorPolicy::Strict => Err(e),
            ErrorPolicy::SkipInvalid => {
                warn!(line = e.line, "skipping malformed preference line: {}", e.reason);
                skipped.push(e);
                Ok(())
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
