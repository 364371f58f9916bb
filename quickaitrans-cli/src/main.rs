//! quickaitrans — keep per-language translation files in sync with a
//! base locale, filling missing keys through an AI translator.
//!
//! # Usage
//!
//! ```text
//! quickaitrans [CONFIG_PATH]        (default: .quickaitrans.json)
//! ```
//!
//! Translator credentials come from the environment: `AI_HOST`,
//! `AI_API_KEY`, `AI_DEPLOYMENT`, `AI_API_VERSION`. Set `RUST_LOG` for
//! per-chunk progress output.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use quickaitrans_sync::{pipeline, LocaleStatus, SyncConfig};
use quickaitrans_translate::{AiClientConfig, AiTranslator, ChatClient};

#[derive(Parser, Debug)]
#[command(
    name = "quickaitrans",
    version,
    about = "Synchronize translation files against a base locale with AI-filled missing keys",
    long_about = None,
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(default_value = ".quickaitrans.json")]
    config: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = SyncConfig::load(&cli.config).with_context(|| {
        format!(
            "could not load configuration from '{}'",
            cli.config.display()
        )
    })?;

    let client_config = AiClientConfig::from_env()?;
    let translator = AiTranslator::new(ChatClient::new(client_config));

    let outcomes = pipeline::run(&config, &translator)?;

    let mut failures = 0;
    for outcome in &outcomes {
        match &outcome.status {
            LocaleStatus::Written { path } => {
                println!("{} '{}' → {}", "✓".green(), outcome.locale, path.display());
            }
            LocaleStatus::Failed { reason } => {
                failures += 1;
                println!("{} '{}' — {reason}", "✗".red(), outcome.locale);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} locale(s) failed");
    }
    Ok(())
}
