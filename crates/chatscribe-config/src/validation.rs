// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::{ScribeConfig, TranscriberBackend};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &ScribeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.general.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::invalid(
            "general.log_level",
            format!(
                "`{}` is not one of {}",
                config.general.log_level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }

    let transcription = &config.transcription;
    if transcription.model.trim().is_empty() {
        errors.push(ConfigError::invalid("transcription.model", "must not be empty"));
    }

    if let Some(language) = &transcription.language {
        if language.trim().is_empty() {
            errors.push(ConfigError::invalid(
                "transcription.language",
                "must be omitted or non-empty",
            ));
        }
    }

    if transcription.timeout_secs == 0 {
        errors.push(ConfigError::invalid(
            "transcription.timeout_secs",
            "must be greater than 0",
        ));
    }

    if transcription.enabled {
        match transcription.backend {
            TranscriberBackend::Http => {
                if transcription.endpoint.trim().is_empty() {
                    errors.push(ConfigError::invalid(
                        "transcription.endpoint",
                        "must not be empty for the http backend",
                    ));
                }
            }
            TranscriberBackend::Command => {
                let missing = transcription
                    .command
                    .as_deref()
                    .is_none_or(|c| c.trim().is_empty());
                if missing {
                    errors.push(ConfigError::invalid(
                        "transcription.command",
                        "is required for the command backend",
                    ));
                }
            }
        }
    }

    let code = config.locale.code.trim();
    if code.is_empty()
        || !code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        errors.push(ConfigError::invalid(
            "locale.code",
            format!(
                "`{}` must be a non-empty code of letters, digits, `-` or `_`",
                config.locale.code
            ),
        ));
    }

    if let Some(dir) = &config.cache.dir {
        if dir.as_os_str().is_empty() {
            errors.push(ConfigError::invalid("cache.dir", "must not be empty when set"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
