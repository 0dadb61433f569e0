// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turning parsed records into a [`RenderContext`].

use std::path::{Path, PathBuf};

use chatscribe_cache::TranscriptionCache;
use chatscribe_config::Locale;
use chatscribe_core::{AttachmentKind, MessageRecord};
use chatscribe_parser::PatternTable;
use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::media::{self, ImagePolicy};
use crate::text::{display_text, escape_html};
use crate::view::{MessageView, RenderContext};

/// Transcription parameters passed to the cache.
#[derive(Debug, Clone)]
pub struct TranscriptionSettings {
    pub model: String,
    /// `None` lets the transcriber detect the language.
    pub language: Option<String>,
}

/// Per-document presentation options.
#[derive(Debug, Clone)]
pub struct AssemblyOptions {
    pub chat_title: String,
    pub footer_text: String,
    pub show_stats: bool,
    pub images: ImagePolicy,
}

/// Builds render contexts for one export directory.
pub struct DocumentAssembler<'a> {
    locale: &'a Locale,
    patterns: &'a PatternTable,
    export_dir: PathBuf,
    options: AssemblyOptions,
    transcription: Option<(&'a TranscriptionCache, TranscriptionSettings)>,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(
        locale: &'a Locale,
        patterns: &'a PatternTable,
        export_dir: impl Into<PathBuf>,
        options: AssemblyOptions,
    ) -> Self {
        Self {
            locale,
            patterns,
            export_dir: export_dir.into(),
            options,
            transcription: None,
        }
    }

    /// Enables transcription of audio attachments through `cache`.
    pub fn with_transcription(
        mut self,
        cache: &'a TranscriptionCache,
        settings: TranscriptionSettings,
    ) -> Self {
        self.transcription = Some((cache, settings));
        self
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Transcribes audio attachments, then builds the context.
    ///
    /// Transcription failures are recorded on the affected message only;
    /// this never fails.
    pub async fn assemble(
        &self,
        records: &mut [MessageRecord],
        is_owner: &(dyn Fn(&str) -> bool + Send + Sync),
    ) -> RenderContext {
        let mut messages = Vec::with_capacity(records.len());
        let mut total_media = 0;
        let mut total_transcriptions = 0;
        let mut last_date: Option<NaiveDate> = None;

        for record in records.iter_mut() {
            let (transcription, transcription_failed) = self.transcribe(record).await;
            if transcription.is_some() && !transcription_failed {
                total_transcriptions += 1;
            }

            let media = match &record.attachment {
                Some(attachment) => {
                    total_media += 1;
                    let policy = self.options.images;
                    Some(media::describe(attachment, &self.export_dir, self.locale, policy).await)
                }
                None => None,
            };

            let date = record.timestamp.date();
            let show_date = last_date != Some(date);
            last_date = Some(date);
            let date_text = format_or_iso(record.timestamp, &self.locale.metadata.date_format);

            let (sender, is_own, message_class) = match record.sender.as_deref() {
                None => (String::new(), false, "system"),
                Some(sender) if is_owner(sender) => (escape_html(sender), true, "user"),
                Some(sender) => (escape_html(sender), false, "other"),
            };

            let filename = record.attachment.as_ref().map(|a| a.filename.as_str());
            let text = display_text(&record.body, self.patterns.attachment_regex(), filename);

            messages.push(MessageView {
                sender,
                time: record.timestamp.format("%H:%M").to_string(),
                current_date: date_text.clone(),
                date: date_text,
                show_date,
                text: escape_html(&text),
                is_system: record.is_system(),
                is_own,
                message_class,
                transcription,
                transcription_failed,
                media,
            });
        }

        info!(
            chat = %self.options.chat_title,
            messages = messages.len(),
            media = total_media,
            transcriptions = total_transcriptions,
            "assembled document"
        );

        let ui = &self.locale.ui;
        RenderContext {
            chat_title: escape_html(&self.options.chat_title),
            generation_date: format_or_iso(
                Local::now().naive_local(),
                &self.locale.metadata.generation_format,
            ),
            language_code: self.locale.metadata.language_code.clone(),
            footer_text: escape_html(&self.options.footer_text),
            show_stats: self.options.show_stats,
            total_messages: messages.len(),
            total_media,
            total_transcriptions,
            label_messages: ui.label_messages.clone(),
            label_media: ui.label_media.clone(),
            label_audio: ui.label_audio.clone(),
            label_transcript: ui.label_transcript.clone(),
            label_footer_generated: ui.label_footer_generated.clone(),
            messages,
        }
    }

    /// Returns the escaped transcript to display and whether it is the
    /// failure marker.
    async fn transcribe(&self, record: &mut MessageRecord) -> (Option<String>, bool) {
        if let Some(existing) = record.transcription() {
            return (Some(escape_html(existing)), false);
        }
        let Some(attachment) = record.attachment.as_ref() else {
            return (None, false);
        };
        if attachment.kind != AttachmentKind::Audio || attachment.missing {
            return (None, false);
        }
        let Some((cache, settings)) = &self.transcription else {
            return (None, false);
        };

        let audio_path = self.export_dir.join(&attachment.filename);
        match cache
            .get_or_compute(&audio_path, &settings.model, settings.language.as_deref())
            .await
        {
            Ok(text) => {
                let shown = escape_html(&text);
                if !record.set_transcription(text) {
                    debug!(file = %audio_path.display(), "transcription already set");
                }
                (Some(shown), false)
            }
            Err(e) => {
                warn!(file = %audio_path.display(), error = %e, "transcription failed");
                let marker = format!("[{}]", self.locale.messages.transcription_failed);
                (Some(escape_html(&marker)), true)
            }
        }
    }
}

/// Formats with a locale-supplied pattern, falling back to ISO 8601 when
/// the pattern is invalid.
fn format_or_iso(timestamp: NaiveDateTime, pattern: &str) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    if write!(out, "{}", timestamp.format(pattern)).is_err() {
        warn!(pattern, "invalid date format in locale");
        return timestamp.format("%Y-%m-%d %H:%M").to_string();
    }
    out
}

/// Chat title derived from the chat text file name.
pub fn chat_title(chat_file: &Path) -> String {
    chat_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
