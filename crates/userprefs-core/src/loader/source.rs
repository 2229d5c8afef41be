//! Where preference text comes from.
//!
//! The loader only needs "give me the whole text once", so sources are a
//! single-method trait.  [`FileSource`] covers the normal case; tests and
//! embedding hosts can supply their own.

use std::io;
use std::path::{Path, PathBuf};

/// A readable origin of preference text.
#[cfg_attr(test, mockall::automock)]
pub trait PrefSource {
    /// Human-readable name used in error messages and logs (usually a path).
    fn describe(&self) -> String;

    /// Reads the entire source as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying source, including
    /// [`io::ErrorKind::InvalidData`] for non-UTF-8 content.
    fn read_to_string(&self) -> io::Result<String>;
}

/// A preference file on the local file system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PrefSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read_to_string(&self) -> io::Result<String> {
        std::fs::read_to_string(&self.path)
    }
}

/// In-memory text, e.g. a preference file embedded with `include_str!`.
impl PrefSource for String {
    fn describe(&self) -> String {
        "<memory>".to_string()
    }

    fn read_to_string(&self) -> io::Result<String> {
        Ok(self.clone())
    }
}
