//! Integration tests for the preference loader.
//!
//! These tests load a complete, real-world `user.js` through the public API
//! and check typing, ordering, determinism and the error policies together.

use userprefs_core::{
    render, ErrorPolicy, LoadError, Loader, PrefKind, PrefValue, PreferenceSet,
};

const SAMPLE: &str = include_str!("fixtures/user.js");

fn sample() -> PreferenceSet {
    PreferenceSet::parse(SAMPLE).expect("sample user.js must parse")
}

// ── Sample file ───────────────────────────────────────────────────────────────

#[test]
fn test_sample_loads_every_declaration() {
    let set = sample();
    assert_eq!(set.len(), 31);
    assert!(set.iter().all(|p| p.kind == PrefKind::User));
}

#[test]
fn test_sample_integer_preferences() {
    let set = sample();
    assert_eq!(set.get("browser.uidensity"), Some(&PrefValue::Int(1)));
    assert_eq!(set.get_int("browser.theme.content-theme"), Some(0));
    assert_eq!(set.get_int("general.smoothScroll.mouseWheel.durationMaxMS"), Some(200));
    assert_eq!(set.get_int("browser.sessionstore.interval"), Some(30000));
    assert_eq!(set.get_int("network.trr.mode"), Some(2));
    assert_eq!(set.get_int("layout.spellcheckDefault"), Some(2));
}

#[test]
fn test_sample_boolean_preferences() {
    let set = sample();
    assert_eq!(set.get("general.smoothScroll"), Some(&PrefValue::Bool(true)));
    assert_eq!(
        set.get_bool("toolkit.legacyUserProfileCustomizations.stylesheets"),
        Some(true)
    );
    assert_eq!(set.get_bool("browser.newtabpage.enabled"), Some(false));
    assert_eq!(set.get_bool("middlemouse.paste"), Some(false));
    assert_eq!(set.get_bool("devtools.debugger.remote-enabled"), Some(true));
}

#[test]
fn test_sample_string_preferences() {
    let set = sample();
    assert_eq!(
        set.get_str("extensions.activeThemeID"),
        Some("firefox-compact-dark@mozilla.org")
    );
    assert_eq!(set.get_str("browser.startup.homepage"), Some("about:blank"));
    assert_eq!(
        set.get_str("network.trr.uri"),
        Some("https://mozilla.cloudflare-dns.com/dns-query")
    );
    assert_eq!(set.get_str("devtools.theme"), Some("dark"));
    assert_eq!(
        set.get_str("font.name.monospace.x-western"),
        Some("JetBrains Mono")
    );
}

#[test]
fn test_sample_preserves_declaration_order() {
    let set = sample();
    let keys: Vec<&str> = set.keys().collect();
    assert_eq!(keys.first(), Some(&"toolkit.legacyUserProfileCustomizations.stylesheets"));
    assert_eq!(keys.last(), Some(&"font.name.monospace.x-western"));
}

#[test]
fn test_sample_records_source_lines() {
    let set = sample();
    let entry = set.entry("browser.uidensity").expect("present");
    let line = SAMPLE.lines().nth(entry.line - 1).expect("line exists");
    assert!(line.contains("browser.uidensity"));
}

// ── Properties ────────────────────────────────────────────────────────────────

#[test]
fn test_loading_twice_is_deterministic() {
    assert_eq!(sample(), sample());
}

#[test]
fn test_rendered_sample_reparses_to_same_mapping() {
    // Arrange
    let original = sample();

    // Act
    let reparsed = PreferenceSet::parse(&render(&original)).expect("rendered text must parse");

    // Assert
    assert_eq!(original.to_map(), reparsed.to_map());
    assert_eq!(
        original.keys().collect::<Vec<_>>(),
        reparsed.keys().collect::<Vec<_>>()
    );
}

#[test]
fn test_appended_override_wins() {
    let src = format!("{SAMPLE}\nuser_pref(\"browser.uidensity\", 0);\n");
    let set = PreferenceSet::parse(&src).unwrap();
    assert_eq!(set.len(), 31);
    assert_eq!(set.get_int("browser.uidensity"), Some(0));
}

#[test]
fn test_bad_line_reports_its_line_number() {
    // Arrange: break the sample by dropping the semicolon on one line.
    let broken = SAMPLE.replacen(
        "user_pref(\"devtools.theme\", \"dark\");",
        "user_pref(\"devtools.theme\", \"dark\")",
        1,
    );
    let expected_line = broken
        .lines()
        .position(|l| l.starts_with("user_pref(\"devtools.theme\""))
        .unwrap()
        + 1;

    // Act
    let err = PreferenceSet::parse(&broken).unwrap_err();

    // Assert
    assert_eq!(err.line, expected_line);
}

#[test]
fn test_lenient_load_of_broken_sample_keeps_other_preferences() {
    let broken = SAMPLE.replacen("user_pref(\"network.trr.mode\", 2);", "user_pref(\"network.trr.mode\", 2;", 1);

    let outcome = Loader::new()
        .with_policy(ErrorPolicy::SkipInvalid)
        .load_str(&broken)
        .unwrap();

    assert_eq!(outcome.set.len(), 30);
    assert!(!outcome.set.contains_key("network.trr.mode"));
    assert_eq!(outcome.skipped.len(), 1);
}

#[test]
fn test_load_file_on_fixture() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/user.js");
    let outcome = Loader::new().load_file(path).expect("fixture must load");
    assert_eq!(outcome.set, sample());
}

#[test]
fn test_load_file_error_names_the_path() {
    let err = Loader::new()
        .load_file("/nonexistent/userprefs/user.js")
        .unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/userprefs/user.js"));
}

#[test]
fn test_set_can_be_shared_across_threads() {
    let set = std::sync::Arc::new(sample());
    let worker = {
        let set = std::sync::Arc::clone(&set);
        std::thread::spawn(move || set.get_str("devtools.theme").map(str::to_string))
    };
    assert_eq!(worker.join().unwrap().as_deref(), Some("dark"));
}
