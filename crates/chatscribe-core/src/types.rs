// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data model shared by the parser, cache, and assembler.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Broad media category of an exported attachment, derived from its extension.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Audio,
    Video,
    Document,
    Unknown,
}

impl AttachmentKind {
    /// Classifies a file name by its extension (case-insensitive).
    pub fn from_file_name(file_name: &str) -> Self {
        let ext = match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
            _ => return Self::Unknown,
        };

        match ext.as_str() {
            "opus" | "m4a" | "mp3" | "wav" | "aac" | "ogg" => Self::Audio,
            "jpg" | "jpeg" | "png" | "gif" | "webp" => Self::Image,
            "mp4" | "3gp" | "mov" | "mkv" | "webm" => Self::Video,
            "pdf" | "doc" | "docx" | "xls" | "xlsx" | "ppt" | "pptx" | "txt" | "vcf" => {
                Self::Document
            }
            _ => Self::Unknown,
        }
    }
}

/// A file referenced by a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// File name as written in the export (directional marks stripped).
    pub filename: String,
    pub kind: AttachmentKind,
    /// True when the file is not part of the export's manifest.
    pub missing: bool,
}

impl Attachment {
    /// Creates an attachment, deriving its kind from the file name.
    pub fn new(filename: impl Into<String>, missing: bool) -> Self {
        let filename = filename.into();
        let kind = AttachmentKind::from_file_name(&filename);
        Self {
            filename,
            kind,
            missing,
        }
    }
}

/// One logical chat entry reconstructed from an export.
///
/// Everything except the transcription is fixed when the parser flushes the
/// record. The transcription can be set once, by the assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRecord {
    /// Minute-precision timestamp from the header line.
    pub timestamp: NaiveDateTime,
    /// `None` for system notices (joins, subject changes, encryption banners).
    pub sender: Option<String>,
    /// Header trailing text followed by every continuation line.
    pub body: Vec<String>,
    pub attachment: Option<Attachment>,
    transcription: Option<String>,
}

impl MessageRecord {
    pub fn new(
        timestamp: NaiveDateTime,
        sender: Option<String>,
        body: Vec<String>,
        attachment: Option<Attachment>,
    ) -> Self {
        Self {
            timestamp,
            sender,
            body,
            attachment,
            transcription: None,
        }
    }

    /// True for notices without an author.
    pub fn is_system(&self) -> bool {
        self.sender.is_none()
    }

    /// Body lines joined with newlines.
    pub fn text(&self) -> String {
        self.body.join("\n")
    }

    pub fn transcription(&self) -> Option<&str> {
        self.transcription.as_deref()
    }

    /// Stores the transcript for an audio attachment.
    ///
    /// Returns `false` and leaves the record untouched when a transcript was
    /// already set or the record carries no audio attachment.
    #[must_use]
    pub fn set_transcription(&mut self, text: String) -> bool {
        let is_audio = self
            .attachment
            .as_ref()
            .is_some_and(|a| a.kind == AttachmentKind::Audio);
        if !is_audio || self.transcription.is_some() {
            return false;
        }
        self.transcription = Some(text);
        true
    }
}

/// Which capture group of a numeric date holds the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// `31/12/24`
    DayFirst,
    /// `12/31/24`
    MonthFirst,
}

/// A locale-supplied description of one header line layout.
///
/// `pattern` is a regular expression with the named groups `date_a`,
/// `date_b`, `year`, `hour`, `minute`, and `text`, plus the optional groups
/// `second`, `meridiem`, and `sender`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderFormatSpec {
    pub name: String,
    pub pattern: String,
    pub date_order: DateOrder,
    /// Sender-less layout used for system notices.
    #[serde(default)]
    pub system: bool,
}

/// Input handed to a [`Transcriber`](crate::traits::Transcriber).
#[derive(Debug, Clone, Copy)]
pub struct TranscriptionRequest<'a> {
    pub audio: &'a [u8],
    /// Original file name, used by backends that need a MIME hint.
    pub file_name: &'a str,
    pub model: &'a str,
    /// `None` asks the backend to auto-detect.
    pub language: Option<&'a str>,
}

/// Result of a successful transcription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    /// Language the backend actually used, when it reports one.
    pub language: Option<String>,
}
