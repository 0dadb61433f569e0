// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compiled pattern table: header matchers and the attachment marker.

use chatscribe_core::{DateOrder, HeaderFormatSpec, ScribeError};
use regex::Regex;

const REQUIRED_GROUPS: &[&str] = &["date_a", "date_b", "year", "hour", "minute", "text"];

/// One compiled header layout.
#[derive(Debug, Clone)]
pub struct HeaderMatcher {
    pub(crate) name: String,
    pub(crate) regex: Regex,
    pub(crate) date_order: DateOrder,
    pub(crate) system: bool,
}

impl HeaderMatcher {
    /// Compiles a locale header spec, checking its capture groups.
    pub fn compile(spec: &HeaderFormatSpec) -> Result<Self, ScribeError> {
        let regex = Regex::new(&spec.pattern).map_err(|e| ScribeError::Pattern {
            name: spec.name.clone(),
            message: e.to_string(),
        })?;

        let groups: Vec<&str> = regex.capture_names().flatten().collect();
        for required in REQUIRED_GROUPS {
            if !groups.contains(required) {
                return Err(ScribeError::Pattern {
                    name: spec.name.clone(),
                    message: format!("missing named group `{required}`"),
                });
            }
        }
        let has_sender = groups.contains(&"sender");
        if spec.system == has_sender {
            let message = if spec.system {
                "system formats must not capture `sender`"
            } else {
                "message formats must capture `sender`"
            };
            return Err(ScribeError::Pattern {
                name: spec.name.clone(),
                message: message.to_string(),
            });
        }

        Ok(Self {
            name: spec.name.clone(),
            regex,
            date_order: spec.date_order,
            system: spec.system,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_system(&self) -> bool {
        self.system
    }
}

/// Locale-specific markers consumed by the parser.
///
/// Header matchers are tried in the order given; the first match wins.
#[derive(Debug, Clone)]
pub struct PatternTable {
    pub(crate) headers: Vec<HeaderMatcher>,
    pub(crate) attachment: Regex,
}

impl PatternTable {
    /// Builds a table from an attachment marker (e.g. `file attached`) and
    /// header specs in priority order.
    pub fn new(
        attached_file_marker: &str,
        header_formats: &[HeaderFormatSpec],
    ) -> Result<Self, ScribeError> {
        if header_formats.is_empty() {
            return Err(ScribeError::Pattern {
                name: "header_formats".to_string(),
                message: "at least one header format is required".to_string(),
            });
        }
        let marker = attached_file_marker.trim();
        if marker.is_empty() {
            return Err(ScribeError::Pattern {
                name: "attached_file".to_string(),
                message: "attachment marker must not be empty".to_string(),
            });
        }

        let headers = header_formats
            .iter()
            .map(HeaderMatcher::compile)
            .collect::<Result<Vec<_>, _>>()?;

        // `IMG-01.jpg (file attached)`, optionally preceded by a directional mark.
        let attachment_pattern = format!(
            r"[\u{{200E}}\u{{200F}}]?(?P<file>[^\s\u{{200E}}\u{{200F}}]+\.[A-Za-z0-9]{{1,5}})\s*\({}\)",
            regex::escape(marker)
        );
        let attachment = Regex::new(&attachment_pattern).map_err(|e| ScribeError::Pattern {
            name: "attached_file".to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            headers,
            attachment,
        })
    }

    pub fn headers(&self) -> &[HeaderMatcher] {
        &self.headers
    }

    /// Regex matching `<file> (<marker>)`, with the file in group `file`.
    pub fn attachment_regex(&self) -> &Regex {
        &self.attachment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, pattern: &str, system: bool) -> HeaderFormatSpec {
        HeaderFormatSpec {
            name: name.into(),
            pattern: pattern.into(),
            date_order: DateOrder::DayFirst,
            system,
        }
    }

    const FULL: &str = r"^(?P<date_a>\d+)/(?P<date_b>\d+)/(?P<year>\d+) (?P<hour>\d+):(?P<minute>\d+) (?P<sender>\w+): (?P<text>.*)$";

    #[test]
    fn compiles_valid_spec() {
        let table = PatternTable::new("file attached", &[spec("a", FULL, false)]).unwrap();
        assert_eq!(table.headers().len(), 1);
        assert_eq!(table.headers()[0].name(), "a");
    }

    #[test]
    fn rejects_invalid_regex() {
        let err = PatternTable::new("file attached", &[spec("broken", "(", false)]).unwrap_err();
        assert!(matches!(err, ScribeError::Pattern { ref name, .. } if name == "broken"));
    }

    #[test]
    fn rejects_missing_groups() {
        let err = PatternTable::new("x", &[spec("nodate", r"^(?P<text>.*)$", true)]).unwrap_err();
        assert!(err.to_string().contains("date_a"));
    }

    #[test]
    fn system_flag_must_match_sender_group() {
        let err = PatternTable::new("x", &[spec("sys", FULL, true)]).unwrap_err();
        assert!(err.to_string().contains("must not capture"));
    }

    #[test]
    fn rejects_empty_inputs() {
        assert!(PatternTable::new("file attached", &[]).is_err());
        assert!(PatternTable::new("  ", &[spec("a", FULL, false)]).is_err());
    }

    #[test]
    fn attachment_marker_is_escaped() {
        let table = PatternTable::new("file (attached)", &[spec("a", FULL, false)]).unwrap();
        let caps = table
            .attachment_regex()
            .captures("DOC-1.pdf (file (attached))")
            .unwrap();
        assert_eq!(&caps["file"], "DOC-1.pdf");
    }
}
