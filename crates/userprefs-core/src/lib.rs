//! # userprefs-core
//!
//! Loader for browser preference files such as `user.js` and `prefs.js`.
//!
//! A preference file is a list of declarations, one per line:
//!
//! ```text
//! // Compact mode
//! user_pref("browser.uidensity", 1);
//! user_pref("general.smoothScroll", true);
//! user_pref("devtools.theme", "dark");
//! ```
//!
//! This crate turns that text into an immutable, typed [`PreferenceSet`].
//! It does not apply preferences to anything; that is the host's job.
//!
//! # Architecture overview (for beginners)
//!
//! - **`pref`** – The data model and the pure text handling:
//!   [`PrefValue`] (bool / int / string), the line [`pref::parser`], the
//!   [`PreferenceSet`] mapping, and [`pref::writer`] which renders a set back
//!   to canonical text.
//!
//! - **`loader`** – Reads a whole source (file, string, or any
//!   [`PrefSource`]) once and applies the caller's [`ErrorPolicy`] to
//!   malformed lines.
//!
//! Nothing here is async or shared-mutable; a loaded set is `Send + Sync` and
//! can be handed to other threads behind an `Arc`.

pub mod loader;
pub mod pref;

// Re-export the most-used types at the crate root so callers can write
// `userprefs_core::PreferenceSet` instead of `userprefs_core::pref::set::PreferenceSet`.
pub use loader::{ErrorPolicy, FileSource, LoadError, LoadOutcome, Loader, PrefSource};
pub use pref::parser::{ParseError, ParseErrorReason};
pub use pref::set::{Preference, PreferenceSet};
pub use pref::value::{PrefKind, PrefValue};
pub use pref::writer::{quote, render};
