//! Preference values, the line parser, the loaded set, and the text writer.

pub mod parser;
pub mod set;
pub mod value;
pub mod writer;

pub use parser::{parse_line, Declaration, ParseError, ParseErrorReason, Parser};
pub use set::{Preference, PreferenceSet};
pub use value::{PrefKind, PrefValue};
pub use writer::{quote, render, render_preference};
