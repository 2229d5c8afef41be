//! Typed preference values and declaration kinds.
//!
//! A preference file only knows three value shapes, and the shape is decided
//! entirely by how the literal is written:
//!
//! | Literal            | Type                  |
//! |--------------------|-----------------------|
//! | `"text"` / `'text'`| [`PrefValue::String`] |
//! | `true` / `false`   | [`PrefValue::Bool`]   |
//! | `125`, `-1`        | [`PrefValue::Int`]    |
//!
//! There are no floats, arrays, or objects.  Hosts that need richer data
//! store it as a JSON string.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pref::writer::quote;

// ── PrefValue ────────────────────────────────────────────────────────────────

/// A single typed preference value.
///
/// Serializes *untagged*: `Bool(true)` becomes `true` in JSON/TOML rather than
/// `{"Bool": true}`, so a whole set can be dumped as a plain key/value table.
///
/// # Examples
///
/// ```rust
/// use userprefs_core::PrefValue;
///
/// let v = PrefValue::from(125);
/// assert_eq!(v.as_int(), Some(125));
/// assert_eq!(v.type_name(), "int");
/// assert_eq!(v.to_string(), "125");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    /// Integer preferences are 32-bit in the consuming browser.
    Int(i32),
    String(String),
}

impl PrefValue {
    /// Returns the value if this is a boolean preference.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value if this is an integer preference.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            PrefValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value if this is a string preference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PrefValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short lowercase name of the value type, used in CLI output and logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            PrefValue::Bool(_) => "bool",
            PrefValue::Int(_) => "int",
            PrefValue::String(_) => "string",
        }
    }
}

/// Formats the value exactly as it would appear in a preference file.
///
/// Strings are double-quoted and escaped, so the output can be pasted back
/// into a `user_pref(...)` call.
impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::Bool(b) => write!(f, "{b}"),
            PrefValue::Int(i) => write!(f, "{i}"),
            PrefValue::String(s) => f.write_str(&quote(s)),
        }
    }
}

impl From<bool> for PrefValue {
    fn from(value: bool) -> Self {
        PrefValue::Bool(value)
    }
}

impl From<i32> for PrefValue {
    fn from(value: i32) -> Self {
        PrefValue::Int(value)
    }
}

impl From<&str> for PrefValue {
    fn from(value: &str) -> Self {
        PrefValue::String(value.to_string())
    }
}

impl From<String> for PrefValue {
    fn from(value: String) -> Self {
        PrefValue::String(value)
    }
}

// ── PrefKind ─────────────────────────────────────────────────────────────────

/// Which declaration function introduced a preference.
///
/// `user.js` files almost always use `user_pref`; the other three appear in
/// default-preference and enterprise files and are accepted so those files
/// load too.  The kind is recorded but carries no extra semantics here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefKind {
    /// `user_pref(...)`
    User,
    /// `pref(...)`
    Default,
    /// `lock_pref(...)`
    Locked,
    /// `sticky_pref(...)`
    Sticky,
}

impl PrefKind {
    /// The function name as written in a preference file.
    pub fn function_name(self) -> &'static str {
        match self {
            PrefKind::User => "user_pref",
            PrefKind::Default => "pref",
            PrefKind::Locked => "lock_pref",
            PrefKind::Sticky => "sticky_pref",
        }
    }
}

impl TryFrom<&str> for PrefKind {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user_pref" => Ok(PrefKind::User),
            "pref" => Ok(PrefKind::Default),
            "lock_pref" => Ok(PrefKind::Locked),
            "sticky_pref" => Ok(PrefKind::Sticky),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PrefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function_name())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_return_none_for_other_types() {
        let v = PrefValue::Bool(true);
        assert_eq!(v.as_bool(), Some(true));
        assert_eq!(v.as_int(), None);
        assert_eq!(v.as_str(), None);
    }

    #[test]
    fn test_display_quotes_and_escapes_strings() {
        // Arrange
        let v = PrefValue::from("say \"hi\"\\now\n");

        // Act
        let shown = v.to_string();

        // Assert
        assert_eq!(shown, r#""say \"hi\"\\now\n""#);
    }

    #[test]
    fn test_display_escapes_other_control_characters() {
        let v = PrefValue::from("a\u{1}b");
        assert_eq!(v.to_string(), r#""a\u0001b""#);
    }

    #[test]
    fn test_display_leaves_non_ascii_untouched() {
        let v = PrefValue::from("JetBrains Mono 🌸");
        assert_eq!(v.to_string(), "\"JetBrains Mono 🌸\"");
    }

    #[test]
    fn test_display_negative_int() {
        assert_eq!(PrefValue::Int(-1).to_string(), "-1");
    }

    #[test]
    fn test_serializes_untagged_to_json() {
        assert_eq!(serde_json::to_string(&PrefValue::Bool(false)).unwrap(), "false");
        assert_eq!(serde_json::to_string(&PrefValue::Int(30000)).unwrap(), "30000");
        assert_eq!(
            serde_json::to_string(&PrefValue::from("dark")).unwrap(),
            "\"dark\""
        );
    }

    #[test]
    fn test_deserializes_untagged_from_json() {
        let v: PrefValue = serde_json::from_str("2").unwrap();
        assert_eq!(v, PrefValue::Int(2));
        let v: PrefValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, PrefValue::Bool(true));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(PrefValue::Bool(true).type_name(), "bool");
        assert_eq!(PrefValue::Int(0).type_name(), "int");
        assert_eq!(PrefValue::from("").type_name(), "string");
    }

    #[test]
    fn test_kind_try_from_known_functions() {
        assert_eq!(PrefKind::try_from("user_pref"), Ok(PrefKind::User));
        assert_eq!(PrefKind::try_from("pref"), Ok(PrefKind::Default));
        assert_eq!(PrefKind::try_from("lock_pref"), Ok(PrefKind::Locked));
        assert_eq!(PrefKind::try_from("sticky_pref"), Ok(PrefKind::Sticky));
    }

    #[test]
    fn test_kind_try_from_unknown_function_fails() {
        assert!(PrefKind::try_from("set_pref").is_err());
        assert!(PrefKind::try_from("User_Pref").is_err());
    }

    #[test]
    fn test_kind_display_matches_function_name() {
        for kind in [PrefKind::User, PrefKind::Default, PrefKind::Locked, PrefKind::Sticky] {
            assert_eq!(kind.to_string(), kind.function_name());
        }
    }
}
