// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for chatscribe.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, miette diagnostics
//! with typo suggestions, and the locale tables consumed by the parser and
//! assembler.
//!
//! # Usage
//!
//! ```no_run
//! use chatscribe_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Transcription model: {}", config.transcription.model);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod locale;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError, ConfigSource};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use locale::{load_locale, Locale};
pub use model::ScribeConfig;

/// Loads from the standard file hierarchy plus `CHATSCRIBE_*` variables and
/// validates the result.
pub fn load_and_validate() -> Result<ScribeConfig, Vec<ConfigError>> {
    checked(loader::load_config(), hierarchy_sources)
}

/// Loads one explicit file (plus environment overrides) and validates it.
pub fn load_and_validate_path(path: &Path) -> Result<ScribeConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || {
        ConfigSource::read(path).into_iter().collect()
    })
}

/// Loads inline TOML and validates it. Used by tests and embedders.
pub fn load_and_validate_str(toml_content: &str) -> Result<ScribeConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![ConfigSource::inline(toml_content)]
    })
}

/// Sources are only read back when extraction failed.
fn checked(
    loaded: Result<ScribeConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<ConfigSource>,
) -> Result<ScribeConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::from_figment(err, &sources())),
    }
}

fn hierarchy_sources() -> Vec<ConfigSource> {
    let local = std::env::current_dir()
        .map(|d| d.join(loader::LOCAL_CONFIG_FILE))
        .unwrap_or_else(|_| loader::LOCAL_CONFIG_FILE.into());
    [
        Some(local),
        loader::user_config_path(),
        Some(loader::SYSTEM_CONFIG_PATH.into()),
    ]
    .into_iter()
    .flatten()
    .filter_map(|path| ConfigSource::read(&path))
    .collect()
}
