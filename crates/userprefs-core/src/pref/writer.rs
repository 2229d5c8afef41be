//! Canonical text rendering of a [`PreferenceSet`].
//!
//! Output is one `function("key", value);` line per preference in set order,
//! with no comments.  Rendering and reparsing yields an equal set (line
//! numbers aside), which makes this the basis of the CLI `fmt` command.

use crate::pref::set::{Preference, PreferenceSet};

/// Renders one preference as a declaration line without a trailing newline.
pub fn render_preference(pref: &Preference) -> String {
    format!(
        "{}({}, {});",
        pref.kind.function_name(),
        quote(&pref.key),
        pref.value
    )
}

/// Renders the whole set, one declaration per line, newline-terminated.
///
/// # Examples
///
/// ```rust
/// use userprefs_core::{pref::writer::render, PreferenceSet};
///
/// let set: PreferenceSet = "user_pref('devtools.theme', 'dark'); // note"
///     .parse()
///     .unwrap();
/// assert_eq!(render(&set), "user_pref(\"devtools.theme\", \"dark\");\n");
/// ```
pub fn render(set: &PreferenceSet) -> String {
    let mut out = String::new();
    for pref in set {
        out.push_str(&render_preference(pref));
        out.push('\n');
    }
    out
}

/// Returns `s` as a double-quoted literal the parser reads back unchanged.
///
/// ```rust
/// use userprefs_core::pref::writer::quote;
///
/// assert_eq!(quote("a\"b\n"), r#""a\"b\n""#);
/// ```
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // Control characters are all in the BMP, so one \u escape is enough.
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pref::value::{PrefKind, PrefValue};

    #[test]
    fn test_render_each_value_type() {
        let set = PreferenceSet::parse(
            "user_pref(\"a\", true);\nuser_pref(\"b\", -5);\nuser_pref(\"c\", \"x\");\n",
        )
        .unwrap();

        assert_eq!(
            render(&set),
            "user_pref(\"a\", true);\nuser_pref(\"b\", -5);\nuser_pref(\"c\", \"x\");\n"
        );
    }

    #[test]
    fn test_render_keeps_declaration_function() {
        let pref = Preference {
            key: "app.update.auto".to_string(),
            value: PrefValue::Bool(false),
            kind: PrefKind::Locked,
            line: 1,
        };
        assert_eq!(
            render_preference(&pref),
            "lock_pref(\"app.update.auto\", false);"
        );
    }

    #[test]
    fn test_render_preference_escapes_key() {
        let pref = Preference {
            key: "odd\"key\\\n".to_string(),
            value: PrefValue::Int(1),
            kind: PrefKind::User,
            line: 1,
        };
        assert_eq!(
            render_preference(&pref),
            r#"user_pref("odd\"key\\\n", 1);"#
        );
    }

    #[test]
    fn test_quote_escapes_control_characters() {
        assert_eq!(quote("a\u{7}b\tc"), r#""a\u0007b\tc""#);
        assert_eq!(quote(""), "\"\"");
    }

    #[test]
    fn test_render_empty_set_is_empty() {
        assert_eq!(render(&PreferenceSet::default()), "");
    }

    #[test]
    fn test_render_drops_comments_and_collapses_duplicates() {
        // Arrange
        let src = "// header\nuser_pref(\"a\", 1);\n\nuser_pref(\"a\", 2); /* again */\n";

        // Act
        let set = PreferenceSet::parse(src).unwrap();

        // Assert
        assert_eq!(render(&set), "user_pref(\"a\", 2);\n");
    }

    #[test]
    fn test_rendered_escapes_reparse_to_same_values() {
        // Arrange: a value that exercises every escape the writer emits.
        let src = r#"user_pref("weird.\"key\"", "tab\there \\ quote\" nl\n bell\u0007");"#;
        let original = PreferenceSet::parse(src).unwrap();

        // Act
        let reparsed = PreferenceSet::parse(&render(&original)).unwrap();

        // Assert
        assert_eq!(original.to_map(), reparsed.to_map());
    }
}
