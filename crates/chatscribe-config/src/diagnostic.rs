// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics.
//!
//! Figment extraction errors become miette reports pointing into the TOML
//! file that caused them. Unknown keys get a "did you mean" hint ranked by
//! Jaro-Winkler similarity against the keys the section accepts.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use std::path::Path;

use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

/// Similarity below which no key is suggested.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration problem, renderable as a miette report.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown key `{key}` in [{section}]")]
    #[diagnostic(
        code(chatscribe::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), accepted))
    )]
    UnknownKey {
        section: String,
        key: String,
        suggestion: Option<String>,
        /// Comma-separated keys the section accepts.
        accepted: String,
        #[label("not a chatscribe setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(code(chatscribe::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        found: String,
        expected: String,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(chatscribe::config::missing_key),
        help("add `{key} = <value>` to chatscribe.toml")
    )]
    MissingKey { key: String },

    /// A value that deserialized but makes no sense.
    #[error("invalid `{field}`: {message}")]
    #[diagnostic(code(chatscribe::config::invalid_value))]
    Validation { field: &'static str, message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(chatscribe::config::other))]
    Other(String),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Graphical report with source context; plain text if rendering fails.
    pub fn render_report(&self) -> String {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = self;
        match GraphicalReportHandler::new().render_report(&mut buf, diagnostic) {
            Ok(()) => buf,
            Err(_) => format!("error: {self}\n"),
        }
    }
}

fn unknown_key_help(suggestion: Option<&str>, accepted: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? accepted keys: {accepted}"),
        None => format!("accepted keys: {accepted}"),
    }
}

/// TOML text a configuration was read from, kept for error spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub name: String,
    pub content: String,
}

impl ConfigSource {
    /// Reads a config file; `None` when it does not exist or is unreadable.
    pub fn read(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        Some(Self {
            name: path.display().to_string(),
            content,
        })
    }

    pub fn inline(content: &str) -> Self {
        Self {
            name: "<inline>".to_string(),
            content: content.to_string(),
        }
    }
}

/// Splits a figment error into one diagnostic per underlying problem.
pub fn from_figment(err: figment::Error, sources: &[ConfigSource]) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let dotted = error
                .path
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(".");
            match &error.kind {
                Kind::UnknownField(key, accepted) => {
                    let section = error.path.first().cloned().unwrap_or_default();
                    let (span, src) = locate(&error, &section, key, sources);
                    ConfigError::UnknownKey {
                        section,
                        key: key.clone(),
                        suggestion: suggest_key(key, accepted),
                        accepted: accepted.join(", "),
                        span,
                        src,
                    }
                }
                Kind::MissingField(key) => ConfigError::MissingKey {
                    key: if dotted.is_empty() {
                        key.to_string()
                    } else {
                        format!("{dotted}.{key}")
                    },
                },
                Kind::InvalidType(found, expected) => ConfigError::InvalidType {
                    key: dotted,
                    found: found.to_string(),
                    expected: expected.clone(),
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

fn locate(
    error: &figment::error::Error,
    section: &str,
    key: &str,
    sources: &[ConfigSource],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let file = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    // Inline TOML carries no file name.
    let source = match file {
        Some(name) => sources.iter().find(|s| s.name == name),
        None if sources.len() == 1 => sources.first(),
        None => None,
    };

    source
        .and_then(|s| {
            let section = (!section.is_empty()).then_some(section);
            let offset = key_offset(&s.content, section, key)?;
            Some((
                Some(SourceSpan::new(offset.into(), key.len())),
                Some(NamedSource::new(&s.name, s.content.clone())),
            ))
        })
        .unwrap_or((None, None))
}

/// Byte offset of `key` inside `[section]` (or the top level when `None`).
///
/// The search stops at the next table header.
pub fn key_offset(content: &str, section: Option<&str>, key: &str) -> Option<usize> {
    let start = match section {
        None => 0,
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header)? + header.len()
        }
    };

    let mut offset = start;
    for line in content[start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if section.is_some() && trimmed.starts_with('[') {
            break;
        }
        let indent = line.len() - trimmed.len();
        let is_key = trimmed
            .strip_prefix(key)
            .is_some_and(|rest| rest.trim_start().starts_with('='));
        if is_key {
            return Some(offset + indent);
        }
        offset += line.len();
    }
    None
}

/// Closest accepted key by Jaro-Winkler similarity, if close enough.
pub fn suggest_key(unknown: &str, accepted: &[&str]) -> Option<String> {
    accepted
        .iter()
        .map(|&k| (strsim::jaro_winkler(unknown, k), k))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Prints every error to stderr.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprint!("{}", error.render_report());
    }
}
