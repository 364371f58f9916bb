//! End-to-end pipeline tests with stub translators — no network.

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tempfile::TempDir;

use quickaitrans_sync::{pipeline, LocaleStatus, SyncConfig, SyncError};
use quickaitrans_translate::{TranslateError, TranslationRequest, Translator};

// ---------------------------------------------------------------------------
// Stub translators
// ---------------------------------------------------------------------------

/// Prefixes every leaf with the destination language code, recording each
/// payload it is handed.
#[derive(Default)]
struct PrefixTranslator {
    calls: Cell<usize>,
    payloads: RefCell<Vec<Map<String, Value>>>,
}

fn prefix_values(map: &Map<String, Value>, lang: &str) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in map {
        let translated = match value {
            Value::String(text) => Value::String(format!("{lang}:{text}")),
            Value::Object(inner) => Value::Object(prefix_values(inner, lang)),
            other => other.clone(),
        };
        out.insert(key.clone(), translated);
    }
    out
}

impl Translator for PrefixTranslator {
    fn translate(
        &self,
        source: &Map<String, Value>,
        request: &TranslationRequest<'_>,
    ) -> Result<Map<String, Value>, TranslateError> {
        self.calls.set(self.calls.get() + 1);
        self.payloads.borrow_mut().push(source.clone());
        Ok(prefix_values(source, request.destination_language))
    }
}

/// Fails for one destination language, prefixes for the rest.
struct FailingFor<'a> {
    broken_locale: &'a str,
}

impl Translator for FailingFor<'_> {
    fn translate(
        &self,
        source: &Map<String, Value>,
        request: &TranslationRequest<'_>,
    ) -> Result<Map<String, Value>, TranslateError> {
        if request.destination_language == self.broken_locale {
            return Err(TranslateError::Api {
                status: 500,
                attempts: 1,
            });
        }
        Ok(prefix_values(source, request.destination_language))
    }
}

/// Returns a shape the tree engine must refuse.
struct JunkTranslator;

impl Translator for JunkTranslator {
    fn translate(
        &self,
        _source: &Map<String, Value>,
        _request: &TranslationRequest<'_>,
    ) -> Result<Map<String, Value>, TranslateError> {
        let mut out = Map::new();
        out.insert("count".to_string(), Value::from(42));
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn config_in(dir: &TempDir, base: &str, targets: &[&str]) -> SyncConfig {
    SyncConfig {
        translation_file_path_template: format!("{}/{{lang}}.json", dir.path().display()),
        base_locale: base.to_string(),
        target_locales: targets.iter().map(|s| s.to_string()).collect(),
        app_info: None,
    }
}

fn write_locale(dir: &TempDir, locale: &str, contents: &str) {
    fs::write(dir.path().join(format!("{locale}.json")), contents).expect("write locale");
}

fn read_locale(dir: &TempDir, locale: &str) -> String {
    fs::read_to_string(dir.path().join(format!("{locale}.json"))).expect("read locale")
}

fn assert_written(status: &LocaleStatus, expected: &Path) {
    match status {
        LocaleStatus::Written { path } => assert_eq!(path, expected),
        LocaleStatus::Failed { reason } => panic!("expected written, got failure: {reason}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn creates_a_missing_target_file_in_base_order() {
    let dir = TempDir::new().unwrap();
    write_locale(
        &dir,
        "en",
        "{\n  \"title\": \"Home\",\n  \"menu\": {\n    \"open\": \"Open\"\n  }\n}\n",
    );
    let config = config_in(&dir, "en", &["de"]);

    let outcomes = pipeline::run(&config, &PrefixTranslator::default()).unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_written(&outcomes[0].status, &dir.path().join("de.json"));
    assert_eq!(
        read_locale(&dir, "de"),
        "{\n  \"title\": \"de:Home\",\n  \"menu\": {\n    \"open\": \"de:Open\"\n  }\n}\n"
    );
}

#[test]
fn existing_translations_are_kept_and_not_resubmitted() {
    let dir = TempDir::new().unwrap();
    write_locale(&dir, "en", r#"{"title": "Home", "extra": "New"}"#);
    write_locale(&dir, "de", r#"{"title": "Startseite"}"#);
    let config = config_in(&dir, "en", &["de"]);
    let translator = PrefixTranslator::default();

    pipeline::run(&config, &translator).unwrap();

    let payloads = translator.payloads.borrow();
    assert_eq!(payloads.len(), 1);
    let keys: Vec<_> = payloads[0].keys().cloned().collect();
    assert_eq!(keys, ["extra"], "only the missing key goes out");

    assert_eq!(
        read_locale(&dir, "de"),
        "{\n  \"title\": \"Startseite\",\n  \"extra\": \"de:New\"\n}\n"
    );
}

#[test]
fn stale_keys_are_pruned_and_order_follows_the_base() {
    let dir = TempDir::new().unwrap();
    write_locale(&dir, "en", r#"{"first": "1", "second": "2"}"#);
    write_locale(&dir, "de", r#"{"second": "zwei", "obsolete": "x"}"#);
    let config = config_in(&dir, "en", &["de"]);

    pipeline::run(&config, &PrefixTranslator::default()).unwrap();

    assert_eq!(
        read_locale(&dir, "de"),
        "{\n  \"first\": \"de:1\",\n  \"second\": \"zwei\"\n}\n"
    );
}

#[test]
fn empty_diff_skips_the_translator_but_rewrites_the_file() {
    let dir = TempDir::new().unwrap();
    write_locale(&dir, "en", r#"{"a": "1", "b": "2"}"#);
    write_locale(&dir, "sv", r#"{"b": "tva", "a": "ett"}"#);
    let config = config_in(&dir, "en", &["sv"]);
    let translator = PrefixTranslator::default();

    pipeline::run(&config, &translator).unwrap();

    assert_eq!(translator.calls.get(), 0, "nothing to translate");
    assert_eq!(
        read_locale(&dir, "sv"),
        "{\n  \"a\": \"ett\",\n  \"b\": \"tva\"\n}\n"
    );
}

#[test]
fn failed_locale_does_not_stop_the_others() {
    let dir = TempDir::new().unwrap();
    write_locale(&dir, "en", r#"{"a": "1"}"#);
    let config = config_in(&dir, "en", &["de", "sv"]);
    let translator = FailingFor { broken_locale: "de" };

    let outcomes = pipeline::run(&config, &translator).unwrap();

    assert_eq!(outcomes.len(), 2);
    assert!(matches!(outcomes[0].status, LocaleStatus::Failed { .. }));
    assert!(!dir.path().join("de.json").exists(), "failed locale writes nothing");
    assert_written(&outcomes[1].status, &dir.path().join("sv.json"));
    assert_eq!(read_locale(&dir, "sv"), "{\n  \"a\": \"sv:1\"\n}\n");
}

#[test]
fn junk_translator_response_fails_the_locale() {
    let dir = TempDir::new().unwrap();
    write_locale(&dir, "en", r#"{"a": "1"}"#);
    let config = config_in(&dir, "en", &["de"]);

    let outcomes = pipeline::run(&config, &JunkTranslator).unwrap();

    assert!(
        matches!(&outcomes[0].status, LocaleStatus::Failed { reason } if reason.contains("rejected"))
    );
    assert!(!dir.path().join("de.json").exists());
}

#[test]
fn missing_base_file_aborts_the_run() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir, "en", &["de"]);

    let err = pipeline::run(&config, &PrefixTranslator::default()).unwrap_err();
    assert!(matches!(err, SyncError::Io { .. }));
}

#[test]
fn malformed_base_file_aborts_the_run() {
    let dir = TempDir::new().unwrap();
    write_locale(&dir, "en", r#"{"a": ["nope"]}"#);
    let config = config_in(&dir, "en", &["de"]);

    let err = pipeline::run(&config, &PrefixTranslator::default()).unwrap_err();
    assert!(matches!(err, SyncError::Parse { .. }));
}

#[test]
fn malformed_target_file_aborts_the_run() {
    let dir = TempDir::new().unwrap();
    write_locale(&dir, "en", r#"{"a": "1"}"#);
    write_locale(&dir, "de", "{broken");
    let config = config_in(&dir, "en", &["de"]);

    let err = pipeline::run(&config, &PrefixTranslator::default()).unwrap_err();
    match err {
        SyncError::Parse { path, .. } => assert!(path.ends_with("de.json")),
        other => panic!("expected parse error, got {other}"),
    }
}

#[test]
fn target_directory_is_created_for_new_locales() {
    let dir = TempDir::new().unwrap();
    let config = SyncConfig {
        translation_file_path_template: format!(
            "{}/locales/{{lang}}/app.json",
            dir.path().display()
        ),
        base_locale: "en".to_string(),
        target_locales: vec!["de".to_string()],
        app_info: None,
    };
    fs::create_dir_all(dir.path().join("locales").join("en")).unwrap();
    fs::write(
        dir.path().join("locales").join("en").join("app.json"),
        r#"{"a": "1"}"#,
    )
    .unwrap();

    let outcomes = pipeline::run(&config, &PrefixTranslator::default()).unwrap();

    assert_written(
        &outcomes[0].status,
        &dir.path().join("locales").join("de").join("app.json"),
    );
}
