//! Rendering preference sets for the terminal.

use std::borrow::Cow;
use std::collections::BTreeMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use userprefs_core::{quote, PrefValue, PreferenceSet};

/// Output format selected by `--format` or `[output] format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `key = value`, one per line.
    #[default]
    Text,
    /// A single JSON object in declaration order.
    Json,
    /// A TOML table with quoted keys.
    Toml,
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode TOML: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Formats every preference in `set`.
///
/// # Errors
///
/// Returns [`OutputError`] if the serializer rejects the data.
pub fn format_set(set: &PreferenceSet, format: OutputFormat) -> Result<String, OutputError> {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for pref in set {
                out.push_str(&format!("{} = {}\n", text_key(&pref.key), pref.value));
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(set)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Toml => Ok(toml::to_string(set)?),
    }
}

/// Keys print bare unless they could break the `key = value` line apart;
/// those are quoted with the same escapes as string values.
fn text_key(key: &str) -> Cow<'_, str> {
    let plain = !key.is_empty()
        && !key
            .chars()
            .any(|c| c.is_control() || c.is_whitespace() || matches!(c, '=' | '"' | '\\'));
    if plain {
        Cow::Borrowed(key)
    } else {
        Cow::Owned(quote(key))
    }
}

/// Formats a single looked-up value.
///
/// Text output is the bare literal (strings keep their quotes), so it can be
/// pasted straight back into a `user_pref` call.
///
/// # Errors
///
/// Returns [`OutputError`] if the serializer rejects the data.
pub fn format_value(
    key: &str,
    value: &PrefValue,
    format: OutputFormat,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Text => Ok(format!("{value}\n")),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string(value)?)),
        OutputFormat::Toml => {
            let table = BTreeMap::from([(key, value)]);
            Ok(toml::to_string(&table)?)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> PreferenceSet {
        PreferenceSet::parse(
            "user_pref(\"browser.uidensity\", 1);\n\
             user_pref(\"general.smoothScroll\", true);\n\
             user_pref(\"devtools.theme\", \"dark\");\n",
        )
        .unwrap()
    }

    #[test]
    fn test_text_output() {
        let out = format_set(&set(), OutputFormat::Text).unwrap();
        assert_eq!(
            out,
            "browser.uidensity = 1\ngeneral.smoothScroll = true\ndevtools.theme = \"dark\"\n"
        );
    }

    #[test]
    fn test_text_output_quotes_keys_that_would_break_the_line() {
        // Arrange
        let set = PreferenceSet::parse(
            "user_pref(\"x\\ny = 2\", 1);\n\
             user_pref(\"a=b\", true);\n\
             user_pref(\"plain.key\", 3);\n",
        )
        .unwrap();

        // Act
        let out = format_set(&set, OutputFormat::Text).unwrap();

        // Assert
        assert_eq!(out, "\"x\\ny = 2\" = 1\n\"a=b\" = true\nplain.key = 3\n");
        assert_eq!(out.lines().count(), set.len());
    }

    #[test]
    fn test_json_output_is_typed_and_ordered() {
        // Act
        let out = format_set(&set(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        // Assert
        assert_eq!(value["browser.uidensity"], serde_json::json!(1));
        assert_eq!(value["general.smoothScroll"], serde_json::json!(true));
        assert_eq!(value["devtools.theme"], serde_json::json!("dark"));
        let first = out.find("browser.uidensity").unwrap();
        let last = out.find("devtools.theme").unwrap();
        assert!(first < last);
    }

    #[test]
    fn test_toml_output_quotes_dotted_keys() {
        // Act
        let out = format_set(&set(), OutputFormat::Toml).unwrap();
        let table: toml::Table = toml::from_str(&out).unwrap();

        // Assert
        assert!(out.contains("\"browser.uidensity\" = 1"));
        assert_eq!(table["general.smoothScroll"], toml::Value::Boolean(true));
        assert_eq!(
            table["devtools.theme"],
            toml::Value::String("dark".to_string())
        );
    }

    #[test]
    fn test_format_value_text_keeps_string_quotes() {
        let out = format_value("devtools.theme", &PrefValue::from("dark"), OutputFormat::Text).unwrap();
        assert_eq!(out, "\"dark\"\n");
    }

    #[test]
    fn test_format_value_json() {
        let out = format_value("a", &PrefValue::Int(125), OutputFormat::Json).unwrap();
        assert_eq!(out, "125\n");
    }

    #[test]
    fn test_format_value_toml() {
        let out = format_value("general.smoothScroll", &PrefValue::Bool(true), OutputFormat::Toml)
            .unwrap();
        assert_eq!(out.trim(), "\"general.smoothScroll\" = true");
    }

    #[test]
    fn test_empty_set_outputs() {
        let empty = PreferenceSet::default();
        assert_eq!(format_set(&empty, OutputFormat::Text).unwrap(), "");
        assert_eq!(format_set(&empty, OutputFormat::Json).unwrap(), "{}\n");
    }
}
