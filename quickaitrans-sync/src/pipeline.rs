//! Per-locale synchronization passes.
//!
//! One pass per target locale, in configuration order:
//! load base → load target → diff → translate the diff → merge →
//! reconcile against the base's key set and order → write atomically.
//!
//! The pass runs through the write even when the diff is empty, so a
//! drifted target file is rewritten into the base's canonical key order.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use quickaitrans_core::{algebra, parse, render, TranslationTree};
use quickaitrans_translate::{TranslationRequest, Translator};

use crate::config::SyncConfig;
use crate::error::{io_err, SyncError};
use crate::writer;

/// Indentation for written translation files.
const INDENT: usize = 2;

/// Terminal state of one locale pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleStatus {
    /// The reconciled file was written.
    Written { path: PathBuf },
    /// The pass was abandoned; previously written locales keep their
    /// results.
    Failed { reason: String },
}

/// Outcome of one target locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleOutcome {
    pub locale: String,
    pub status: LocaleStatus,
}

/// Synchronize every target locale against the base locale.
///
/// An unreadable or malformed base file, and a malformed (though not
/// missing) target file, abort the run. Translation and write failures
/// mark that locale failed and the run continues with the next one.
pub fn run<T: Translator>(
    config: &SyncConfig,
    translator: &T,
) -> Result<Vec<LocaleOutcome>, SyncError> {
    let base_path = config.path_for_locale(&config.base_locale);
    let base_text = std::fs::read_to_string(&base_path).map_err(|e| io_err(&base_path, e))?;
    let base = parse(&base_text).map_err(|source| SyncError::Parse {
        path: base_path.clone(),
        source,
    })?;

    let mut outcomes = Vec::with_capacity(config.target_locales.len());
    for locale in &config.target_locales {
        outcomes.push(sync_locale(config, translator, &base, locale)?);
    }
    Ok(outcomes)
}

fn sync_locale<T: Translator>(
    config: &SyncConfig,
    translator: &T,
    base: &TranslationTree,
    locale: &str,
) -> Result<LocaleOutcome, SyncError> {
    let path = config.path_for_locale(locale);
    let target = load_target(&path)?;

    let missing = algebra::diff(base, &target);
    let translated = if missing.is_empty() {
        info!(
            "'{locale}' already has every key of '{}'",
            config.base_locale
        );
        TranslationTree::new()
    } else {
        info!("translating {} missing key(s) for '{locale}'", missing.len());
        let request = TranslationRequest {
            source_language: &config.base_locale,
            destination_language: locale,
            app_info: config.app_info.as_deref(),
        };
        let answer = match translator.translate(&missing.to_object(), &request) {
            Ok(answer) => answer,
            Err(err) => {
                error!("'{locale}' translation failed: {err}");
                return Ok(failed(locale, format!("translation failed: {err}")));
            }
        };
        match TranslationTree::from_object(&answer) {
            Ok(tree) => tree,
            Err(err) => {
                error!("'{locale}' translation response rejected: {err}");
                return Ok(failed(
                    locale,
                    format!("translation response rejected: {err}"),
                ));
            }
        }
    };

    let merged = algebra::merge(&target, &translated);
    let resolved = algebra::insert_values_from_reference(base, &merged);
    let mut contents = render(&resolved, INDENT);
    contents.push('\n');

    if let Err(err) = writer::write_atomic(&path, &contents) {
        error!("'{locale}' write failed: {err}");
        return Ok(failed(locale, format!("write failed: {err}")));
    }
    info!("wrote {}", path.display());
    Ok(LocaleOutcome {
        locale: locale.to_string(),
        status: LocaleStatus::Written { path },
    })
}

/// Read and parse the current target file.
///
/// A missing or unreadable file starts the locale from an empty tree and
/// ensures the destination directory exists; a file that reads but fails
/// to parse aborts the run.
fn load_target(path: &Path) -> Result<TranslationTree, SyncError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!(
                "target file {} not readable ({err}); creating a new one",
                path.display()
            );
            if let Some(parent) = path.parent() {
                if let Err(mkdir) = std::fs::create_dir_all(parent) {
                    warn!(
                        "could not create output directory {}: {mkdir}",
                        parent.display()
                    );
                }
            }
            return Ok(TranslationTree::new());
        }
    };
    parse(&text).map_err(|source| SyncError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn failed(locale: &str, reason: String) -> LocaleOutcome {
    LocaleOutcome {
        locale: locale.to_string(),
        status: LocaleStatus::Failed { reason },
    }
}
