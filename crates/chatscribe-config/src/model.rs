// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `chatscribe.toml` schema.
//!
//! Every table denies unknown fields so a misspelled key is reported instead
//! of silently ignored.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root of the configuration file. Each table may be omitted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScribeConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Speech-to-text backend settings.
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Transcript cache location.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Locale selection for header patterns and labels.
    #[serde(default)]
    pub locale: LocaleConfig,

    /// HTML rendering settings.
    #[serde(default)]
    pub render: RenderConfig,

    /// Privacy switches applied while assembling documents.
    #[serde(default)]
    pub privacy: PrivacyConfig,
}

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// `trace`, `debug`, `info`, `warn` or `error`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Which transcriber implementation handles cache misses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriberBackend {
    /// OpenAI-compatible `/audio/transcriptions` endpoint.
    #[default]
    Http,
    /// External program that prints the transcript on stdout.
    Command,
}

/// Speech-to-text configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TranscriptionConfig {
    /// Set to `false` to leave audio attachments untranscribed.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub backend: TranscriberBackend,

    /// Model identifier. Part of the cache fingerprint.
    #[serde(default = "default_model")]
    pub model: String,

    /// Requested language code. `None` lets the backend auto-detect.
    #[serde(default)]
    pub language: Option<String>,

    /// Endpoint for the HTTP backend.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Name of the environment variable holding the HTTP bearer token.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout for the HTTP backend, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Program for the command backend.
    #[serde(default)]
    pub command: Option<String>,

    /// Arguments for the command backend. `{input}`, `{model}`, and
    /// `{language}` are substituted.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: TranscriberBackend::default(),
            model: default_model(),
            language: None,
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            command: None,
            args: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_model() -> String {
    "whisper-1".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/audio/transcriptions".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

/// Transcript cache configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Cache directory. Defaults to the platform cache dir.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    /// Resolves the cache directory.
    ///
    /// Falls back to `./.chatscribe-cache` when the platform has no cache dir.
    pub fn resolved_dir(&self) -> PathBuf {
        if let Some(dir) = &self.dir {
            return dir.clone();
        }
        dirs::cache_dir()
            .map(|d| d.join("chatscribe").join("transcripts"))
            .unwrap_or_else(|| PathBuf::from(".chatscribe-cache"))
    }
}

/// Locale selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LocaleConfig {
    /// Locale code, e.g. `en` or `it`.
    #[serde(default = "default_locale_code")]
    pub code: String,

    /// Directory searched for `<code>.toml` before the bundled tables.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            code: default_locale_code(),
            dir: None,
        }
    }
}

fn default_locale_code() -> String {
    "en".to_string()
}

/// HTML rendering configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Template file. The bundled template is used when unset.
    #[serde(default)]
    pub template: Option<PathBuf>,

    /// Sender name rendered as the export owner. When unset, the owner is
    /// inferred from the chat title of one-to-one chats.
    #[serde(default)]
    pub user_name: Option<String>,

    /// Expose the statistics block to the template.
    #[serde(default = "default_true")]
    pub show_stats: bool,

    #[serde(default)]
    pub footer_text: String,

    /// Inline images as `data:` URIs so the HTML is self-contained.
    #[serde(default = "default_true")]
    pub embed_images: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template: None,
            user_name: None,
            show_stats: true,
            footer_text: String::new(),
            embed_images: true,
        }
    }
}

/// Privacy configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrivacyConfig {
    /// Replace images with a placeholder instead of embedding them.
    #[serde(default)]
    pub exclude_images: bool,
}
