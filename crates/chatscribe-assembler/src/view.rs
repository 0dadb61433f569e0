// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serializable view objects the template is rendered against.
//!
//! All strings derived from message content are HTML-escaped when the views
//! are built; templates interpolate them verbatim.

use chatscribe_core::{AttachmentKind, ScribeError};
use serde::Serialize;
use serde_json::Value;

/// Root object of a rendered document.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    pub chat_title: String,
    pub generation_date: String,
    pub language_code: String,
    pub footer_text: String,
    pub show_stats: bool,
    pub total_messages: usize,
    pub total_media: usize,
    pub total_transcriptions: usize,
    pub label_messages: String,
    pub label_media: String,
    pub label_audio: String,
    pub label_transcript: String,
    pub label_footer_generated: String,
    pub messages: Vec<MessageView>,
}

impl RenderContext {
    /// Converts to the JSON tree consumed by the template engine.
    pub fn to_value(&self) -> Result<Value, ScribeError> {
        serde_json::to_value(self)
            .map_err(|e| ScribeError::Internal(format!("render context serialization: {e}")))
    }
}

/// One message as presented.
#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    /// Empty for system notices.
    pub sender: String,
    pub date: String,
    pub time: String,
    /// First message of its calendar day.
    pub show_date: bool,
    pub current_date: String,
    pub text: String,
    pub is_system: bool,
    pub is_own: bool,
    /// `user`, `other` or `system`.
    pub message_class: &'static str,
    pub transcription: Option<String>,
    pub transcription_failed: bool,
    pub media: Option<MediaView>,
}

/// Descriptor of an attached file.
#[derive(Debug, Clone, Serialize)]
pub struct MediaView {
    pub filename: String,
    pub kind: AttachmentKind,
    pub label: String,
    pub missing: bool,
    pub is_image: bool,
    pub is_audio: bool,
    pub is_video: bool,
    pub is_document: bool,
    /// `data:` URI for embedded images, otherwise the relative file name.
    pub src: String,
}
