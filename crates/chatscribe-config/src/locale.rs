// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Locale tables: header layouts, attachment marker, and display strings.
//!
//! A locale is a TOML document. `en` and `it` are bundled; any other code is
//! looked up as `<locale.dir>/<code>.toml`. Locales are plain values passed
//! explicitly to the parser and assembler, so documents in different locales
//! can be processed side by side.

use std::path::Path;

use chatscribe_core::{HeaderFormatSpec, ScribeError};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::model::LocaleConfig;

const BUNDLED_EN: &str = include_str!("../locales/en.toml");
const BUNDLED_IT: &str = include_str!("../locales/it.toml");

/// Locale used when the requested one cannot be found.
pub const FALLBACK_LOCALE: &str = "en";

/// A fully loaded locale.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Locale {
    pub metadata: LocaleMetadata,
    pub patterns: LocalePatterns,
    pub labels: LocaleLabels,
    pub messages: LocaleMessages,
    pub ui: LocaleUi,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocaleMetadata {
    pub language_code: String,
    /// `chrono` format for date dividers.
    pub date_format: String,
    /// `chrono` format for the document generation timestamp.
    pub generation_format: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalePatterns {
    /// Text inside the parentheses after an attached file name.
    pub attached_file: String,
    /// Prefix of the export name before the contact name.
    pub chat_title_prefix: String,
    /// Header layouts in priority order.
    pub header_formats: Vec<HeaderFormatSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocaleLabels {
    pub audio: String,
    pub image: String,
    pub video: String,
    pub document: String,
    pub unknown: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocaleMessages {
    pub image_excluded: String,
    pub transcription_failed: String,
    pub missing_file: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocaleUi {
    pub label_messages: String,
    pub label_media: String,
    pub label_audio: String,
    pub label_transcript: String,
    pub label_footer_generated: String,
}

/// Returns the bundled TOML source for a locale code.
pub fn bundled_locale_source(code: &str) -> Option<&'static str> {
    match code {
        "en" => Some(BUNDLED_EN),
        "it" => Some(BUNDLED_IT),
        _ => None,
    }
}

/// Parses a locale from TOML text.
pub fn parse_locale(toml_content: &str) -> Result<Locale, ScribeError> {
    let locale: Locale = toml::from_str(toml_content)
        .map_err(|e| ScribeError::Config(format!("invalid locale file: {e}")))?;
    if locale.patterns.header_formats.is_empty() {
        return Err(ScribeError::Config(
            "locale defines no header formats".to_string(),
        ));
    }
    Ok(locale)
}

/// Loads a bundled locale by code.
pub fn bundled_locale(code: &str) -> Result<Locale, ScribeError> {
    let source = bundled_locale_source(code)
        .ok_or_else(|| ScribeError::Config(format!("no bundled locale `{code}`")))?;
    parse_locale(source)
}

/// Loads the locale selected by the configuration.
///
/// Lookup order: `<dir>/<code>.toml`, then the bundled table for `code`,
/// then the bundled English table (with a warning). A locale file that
/// exists but fails to parse is an error, not a fallback.
pub fn load_locale(config: &LocaleConfig) -> Result<Locale, ScribeError> {
    load_locale_code(&config.code, config.dir.as_deref())
}

/// Like [`load_locale`] with an explicit code, used for per-run overrides.
pub fn load_locale_code(code: &str, dir: Option<&Path>) -> Result<Locale, ScribeError> {
    if let Some(dir) = dir {
        let path = dir.join(format!("{code}.toml"));
        if path.is_file() {
            let content =
                std::fs::read_to_string(&path).map_err(|e| ScribeError::io(&path, e))?;
            debug!(path = %path.display(), "loaded locale file");
            return parse_locale(&content);
        }
    }

    if bundled_locale_source(code).is_some() {
        return bundled_locale(code);
    }

    warn!(
        requested = code,
        fallback = FALLBACK_LOCALE,
        "locale not found, falling back"
    );
    bundled_locale(FALLBACK_LOCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatscribe_core::DateOrder;

    #[test]
    fn bundled_locales_parse() {
        let en = bundled_locale("en").unwrap();
        assert_eq!(en.metadata.language_code, "en");
        assert_eq!(en.patterns.attached_file, "file attached");
        assert_eq!(en.patterns.header_formats.len(), 4);
        assert_eq!(en.patterns.header_formats[0].date_order, DateOrder::MonthFirst);
        assert!(!en.patterns.header_formats[0].system);
        assert!(en.patterns.header_formats[1].system);

        let it = bundled_locale("it").unwrap();
        assert_eq!(it.patterns.attached_file, "file allegato");
        assert_eq!(it.patterns.header_formats[0].date_order, DateOrder::DayFirst);
        assert_eq!(it.messages.transcription_failed, "Trascrizione non riuscita");
    }

    #[test]
    fn unknown_code_falls_back_to_english() {
        let locale = load_locale_code("xx", None).unwrap();
        assert_eq!(locale.metadata.language_code, "en");
    }

    #[test]
    fn locale_dir_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let custom = BUNDLED_EN.replace("file attached", "archivo adjunto");
        std::fs::write(dir.path().join("es.toml"), custom).unwrap();

        let locale = load_locale_code("es", Some(dir.path())).unwrap();
        assert_eq!(locale.patterns.attached_file, "archivo adjunto");
    }

    #[test]
    fn broken_locale_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en.toml"), "[metadata]\nlanguage_code = 1\n").unwrap();
        assert!(load_locale_code("en", Some(dir.path())).is_err());
    }

    #[test]
    fn empty_header_formats_rejected() {
        let toml = BUNDLED_EN
            .split("[[patterns.header_formats]]")
            .next()
            .unwrap()
            .to_string()
            + "header_formats = []\n"
            + "[labels]\naudio = \"a\"\nimage = \"i\"\nvideo = \"v\"\ndocument = \"d\"\nunknown = \"u\"\n"
            + "[messages]\nimage_excluded = \"x\"\ntranscription_failed = \"f\"\nmissing_file = \"m\"\n"
            + "[ui]\nlabel_messages = \"m\"\nlabel_media = \"m\"\nlabel_audio = \"a\"\nlabel_transcript = \"t\"\nlabel_footer_generated = \"g\"\n";
        let err = parse_locale(&toml).unwrap_err();
        assert!(err.to_string().contains("no header formats"));
    }
}
