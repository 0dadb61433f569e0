// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Media descriptors for attachments.

use std::path::Path;

use chatscribe_config::Locale;
use chatscribe_core::{Attachment, AttachmentKind};
use tracing::warn;

use crate::text::escape_html;
use crate::view::MediaView;

/// How images end up in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePolicy {
    /// Inline present images as base64 `data:` URIs.
    pub embed: bool,
    /// Replace images with a placeholder.
    pub exclude: bool,
}

fn image_mime(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}

fn kind_label(locale: &Locale, kind: AttachmentKind) -> &str {
    let labels = &locale.labels;
    match kind {
        AttachmentKind::Image => &labels.image,
        AttachmentKind::Audio => &labels.audio,
        AttachmentKind::Video => &labels.video,
        AttachmentKind::Document => &labels.document,
        AttachmentKind::Unknown => &labels.unknown,
    }
}

/// Builds the descriptor for one attachment, reading image bytes from
/// `export_dir` when they are to be embedded.
pub async fn describe(
    attachment: &Attachment,
    export_dir: &Path,
    locale: &Locale,
    policy: ImagePolicy,
) -> MediaView {
    let filename = escape_html(&attachment.filename);
    let kind = attachment.kind;
    let base_label = kind_label(locale, kind);
    let excluded = kind == AttachmentKind::Image && policy.exclude;

    let label = if excluded {
        format!("{base_label} ({})", locale.messages.image_excluded)
    } else if attachment.missing {
        format!("{base_label} ({})", locale.messages.missing_file)
    } else {
        base_label.to_string()
    };

    let mut src = if excluded { String::new() } else { filename.clone() };
    if kind == AttachmentKind::Image && policy.embed && !excluded && !attachment.missing {
        let path = export_dir.join(&attachment.filename);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                use base64::Engine;
                let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
                src = format!("data:{};base64,{encoded}", image_mime(&attachment.filename));
            }
            Err(e) => warn!(path = %path.display(), error = %e, "cannot embed image"),
        }
    }

    MediaView {
        filename,
        kind,
        label: escape_html(&label),
        missing: attachment.missing,
        is_image: kind == AttachmentKind::Image && !excluded,
        is_audio: kind == AttachmentKind::Audio,
        is_video: kind == AttachmentKind::Video,
        is_document: kind == AttachmentKind::Document,
        src,
    }
}
