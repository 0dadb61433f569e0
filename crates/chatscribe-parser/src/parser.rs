// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-state scanner turning an export's text into message records.
//!
//! The scanner is either idle (no open record) or accumulating one. A header
//! line flushes the open record and starts a new one; any other line extends
//! the open record, or is discarded while idle. End of input flushes.

use std::collections::BTreeSet;

use chatscribe_core::{Attachment, MessageRecord};
use chrono::NaiveDateTime;
use tracing::{debug, trace};

use crate::line::{classify, Line};
use crate::patterns::PatternTable;

/// File names present in an export, used to resolve attachment references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    names: BTreeSet<String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Manifest {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Records plus bookkeeping about what the scanner skipped.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub records: Vec<MessageRecord>,
    /// Lines seen before the first header.
    pub discarded_lines: usize,
}

const TOKEN_PUNCTUATION: &[char] = &[
    '<', '>', '(', ')', '[', ']', '"', '\'', ',', ':', ';', '\u{200E}', '\u{200F}',
];

struct OpenRecord {
    timestamp: NaiveDateTime,
    sender: Option<String>,
    body: Vec<String>,
}

/// Parser bound to one locale's pattern table.
#[derive(Debug, Clone, Copy)]
pub struct ExportParser<'t> {
    table: &'t PatternTable,
}

impl<'t> ExportParser<'t> {
    pub fn new(table: &'t PatternTable) -> Self {
        Self { table }
    }

    /// Parses raw export text. Never fails; unrecognised content before
    /// the first header is counted and dropped.
    pub fn parse(&self, raw: &str, manifest: &Manifest) -> ParseOutcome {
        let raw = raw.strip_prefix('\u{FEFF}').unwrap_or(raw);
        let mut outcome = ParseOutcome::default();
        let mut open: Option<OpenRecord> = None;

        for line in raw.lines() {
            match classify(self.table, line, open.is_some()) {
                Line::Header(header) => {
                    if let Some(record) = open.take() {
                        outcome.records.push(self.finish(record, manifest));
                    }
                    trace!(format = header.format, "header line");
                    open = Some(OpenRecord {
                        timestamp: header.timestamp,
                        sender: header.sender.map(str::to_string),
                        body: vec![header.text.to_string()],
                    });
                }
                Line::Continuation(text) => {
                    if let Some(record) = open.as_mut() {
                        record.body.push(text.to_string());
                    }
                }
                Line::Unmatched(text) => {
                    if !text.trim().is_empty() {
                        outcome.discarded_lines += 1;
                    }
                }
            }
        }

        if let Some(record) = open.take() {
            outcome.records.push(self.finish(record, manifest));
        }

        debug!(
            records = outcome.records.len(),
            discarded = outcome.discarded_lines,
            "parsed export"
        );
        outcome
    }

    fn finish(&self, record: OpenRecord, manifest: &Manifest) -> MessageRecord {
        let attachment = self.detect_attachment(&record.body, manifest);
        MessageRecord::new(record.timestamp, record.sender, record.body, attachment)
    }

    /// Finds the first attachment reference in a body.
    ///
    /// The locale marker (`IMG-01.jpg (file attached)`) wins; otherwise a
    /// body token naming a manifest file (`<attached: 0001-PHOTO.jpg>`) is
    /// accepted.
    fn detect_attachment(&self, body: &[String], manifest: &Manifest) -> Option<Attachment> {
        for line in body {
            if let Some(file) = self
                .table
                .attachment
                .captures(line)
                .and_then(|caps| caps.name("file"))
            {
                return Some(resolve_marked(line, file, manifest));
            }
        }

        body.iter()
            .flat_map(|line| line.split_whitespace())
            .map(|token| token.trim_matches(TOKEN_PUNCTUATION))
            .find(|token| !token.is_empty() && manifest.contains(token))
            .map(|name| Attachment::new(name, false))
    }
}

/// Resolves a marker reference against the manifest.
///
/// The marker regex only sees the last token before `(file attached)`, so
/// `Trip Plan.pdf` arrives as `Plan.pdf`. Longer whitespace-bounded suffixes
/// ending at the token are tried first; the bare token is kept, flagged
/// missing, when none is in the manifest.
fn resolve_marked(line: &str, file: regex::Match<'_>, manifest: &Manifest) -> Attachment {
    let head = &line[..file.start()];
    let starts = std::iter::once(0).chain(
        head.char_indices()
            .filter(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8()),
    );
    for start in starts {
        let candidate = line[start..file.end()].trim_start_matches(TOKEN_PUNCTUATION);
        if manifest.contains(candidate) {
            return Attachment::new(candidate, false);
        }
    }

    debug!(filename = file.as_str(), "attachment not in export");
    Attachment::new(file.as_str(), true)
}

/// Convenience wrapper returning only the records.
pub fn parse(raw: &str, manifest: &Manifest, table: &PatternTable) -> Vec<MessageRecord> {
    ExportParser::new(table).parse(raw, manifest).records
}
