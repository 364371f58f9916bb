//! Run configuration — the `.quickaitrans.json` file.
//!
//! Field names mirror the on-disk camelCase document. Unknown fields are
//! ignored; schema violations beyond JSON syntax are reported as
//! [`ConfigError`]s before any translation file is touched.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Placeholder substituted with a locale code in the path template.
pub const LANG_PLACEHOLDER: &str = "{lang}";

/// Errors from loading or validating the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration at {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("configuration field '{field}' must be a non-empty string")]
    EmptyField { field: &'static str },

    #[error("'translationFilePathTemplate' must contain the {LANG_PLACEHOLDER} placeholder")]
    MissingPlaceholder,

    #[error("'targetLocales' must be a list of non-empty strings")]
    InvalidTargetLocales,
}

/// The synchronization run configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    /// Path template for all translation files, e.g. `locales/{lang}.json`.
    pub translation_file_path_template: String,
    /// The authoritative source language.
    pub base_locale: String,
    /// Destination languages, processed in this order.
    pub target_locales: Vec<String>,
    /// Optional context handed to the translator, e.g. what the app does.
    #[serde(default)]
    pub app_info: Option<String>,
}

impl SyncConfig {
    /// Load and validate the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SyncConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Schema checks beyond what deserialization enforces.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.translation_file_path_template.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                field: "translationFilePathTemplate",
            });
        }
        if !self.translation_file_path_template.contains(LANG_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder);
        }
        if self.base_locale.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                field: "baseLocale",
            });
        }
        if self
            .target_locales
            .iter()
            .any(|locale| locale.trim().is_empty())
        {
            return Err(ConfigError::InvalidTargetLocales);
        }
        Ok(())
    }

    /// Path of the translation file for `locale`.
    pub fn path_for_locale(&self, locale: &str) -> PathBuf {
        PathBuf::from(
            self.translation_file_path_template
                .replace(LANG_PLACEHOLDER, locale),
        )
    }
}
