// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assembly of parsed exports into render contexts.

use std::sync::Arc;

use chatscribe_assembler::{
    configured_owner, detect_owner, AssemblyOptions, DocumentAssembler, ImagePolicy,
    TranscriptionSettings, DEFAULT_TEMPLATE,
};
use chatscribe_cache::TranscriptionCache;
use chatscribe_config::locale::bundled_locale;
use chatscribe_config::Locale;
use chatscribe_core::MessageRecord;
use chatscribe_parser::{parse, Manifest, PatternTable};
use chatscribe_template::Template;
use chatscribe_test_utils::{ExportFixture, MockTranscriber};

const TITLE: &str = "WhatsApp Chat with Bob";

fn english() -> (Locale, PatternTable) {
    let locale = bundled_locale("en").unwrap();
    let table = PatternTable::new(
        &locale.patterns.attached_file,
        &locale.patterns.header_formats,
    )
    .unwrap();
    (locale, table)
}

fn options() -> AssemblyOptions {
    AssemblyOptions {
        chat_title: TITLE.to_string(),
        footer_text: "Family archive".to_string(),
        show_stats: true,
        images: ImagePolicy {
            embed: false,
            exclude: false,
        },
    }
}

fn fixture() -> ExportFixture {
    ExportFixture::builder(TITLE)
        .line("3/1/24, 09:00 - Messages and calls are end-to-end encrypted.")
        .line("3/1/24, 10:05 - Alice: IMG-01.jpg (file attached)")
        .line("see you there")
        .line("3/1/24, 10:06 - Bob: PTT-20240301-WA0001.opus (file attached)")
        .line("3/2/24, 08:00 - Bob: <b>bold</b> & co")
        .line("3/2/24, 08:01 - Alice: PTT-20240302-WA0002.opus (file attached)")
        .media("IMG-01.jpg", b"\xff\xd8\xff")
        .media("PTT-20240301-WA0001.opus", b"OggS one")
        .build()
        .unwrap()
}

fn records(fixture: &ExportFixture, table: &PatternTable) -> Vec<MessageRecord> {
    let raw = std::fs::read_to_string(fixture.chat_file()).unwrap();
    let manifest: Manifest = std::fs::read_dir(fixture.export_dir())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    parse(&raw, &manifest, table)
}

#[tokio::test]
async fn builds_views_counts_and_classes() {
    let (locale, table) = english();
    let fixture = fixture();
    let mut records = records(&fixture, &table);
    assert_eq!(records.len(), 5);

    let cache_dir = tempfile::tempdir().unwrap();
    let mock = Arc::new(MockTranscriber::with_responses(vec!["hello from bob".into()]));
    let cache = TranscriptionCache::new(cache_dir.path(), mock.clone());
    let settings = TranscriptionSettings {
        model: "whisper-1".into(),
        language: None,
    };

    let assembler = DocumentAssembler::new(&locale, &table, fixture.export_dir(), options())
        .with_transcription(&cache, settings);
    let is_owner = detect_owner(TITLE, &locale.patterns.chat_title_prefix, &records);
    let ctx = assembler.assemble(&mut records, &*is_owner).await;

    assert_eq!(ctx.total_messages, 5);
    assert_eq!(ctx.total_media, 3);
    assert_eq!(ctx.total_transcriptions, 1);
    // The second voice note is not in the export, so it is never sent.
    assert_eq!(mock.calls(), 1);

    let m = &ctx.messages;
    assert!(m[0].is_system);
    assert_eq!(m[0].message_class, "system");
    assert!(m[0].show_date);
    assert_eq!(m[0].current_date, "03/01/2024");

    assert_eq!(m[1].message_class, "user");
    assert_eq!(m[1].text, "see you there");
    assert!(!m[1].show_date);
    let media = m[1].media.as_ref().unwrap();
    assert!(media.is_image);
    assert_eq!(media.src, "IMG-01.jpg");

    assert_eq!(m[2].message_class, "other");
    assert_eq!(m[2].transcription.as_deref(), Some("hello from bob"));
    assert_eq!(records[2].transcription(), Some("hello from bob"));

    assert!(m[3].show_date);
    assert_eq!(m[3].text, "&lt;b&gt;bold&lt;/b&gt; &amp; co");

    let missing = m[4].media.as_ref().unwrap();
    assert!(missing.missing);
    assert!(m[4].transcription.is_none());
}

#[tokio::test]
async fn transcription_failure_marks_only_that_message() {
    let (locale, table) = english();
    let fixture = fixture();
    let mut records = records(&fixture, &table);

    let cache_dir = tempfile::tempdir().unwrap();
    let mock = Arc::new(MockTranscriber::with_outcomes(vec![Err("offline".into())]));
    let cache = TranscriptionCache::new(cache_dir.path(), mock.clone());
    let assembler = DocumentAssembler::new(&locale, &table, fixture.export_dir(), options())
        .with_transcription(
            &cache,
            TranscriptionSettings {
                model: "whisper-1".into(),
                language: Some("en".into()),
            },
        );

    let is_owner = configured_owner("Alice");
    let ctx = assembler.assemble(&mut records, &*is_owner).await;

    assert_eq!(ctx.total_messages, 5);
    assert_eq!(ctx.total_transcriptions, 0);
    assert!(ctx.messages[2].transcription_failed);
    assert_eq!(
        ctx.messages[2].transcription.as_deref(),
        Some("[Transcription failed]")
    );
    assert_eq!(records[2].transcription(), None);
}

#[tokio::test]
async fn without_cache_audio_is_left_alone() {
    let (locale, table) = english();
    let fixture = fixture();
    let mut records = records(&fixture, &table);

    let assembler = DocumentAssembler::new(&locale, &table, fixture.export_dir(), options());
    let is_owner = configured_owner("Alice");
    let ctx = assembler.assemble(&mut records, &*is_owner).await;

    assert_eq!(ctx.total_transcriptions, 0);
    assert!(ctx.messages.iter().all(|m| m.transcription.is_none()));
}

#[tokio::test]
async fn default_template_renders_the_context() {
    let (locale, table) = english();
    let fixture = fixture();
    let mut records = records(&fixture, &table);
    let mut opts = options();
    opts.images.embed = true;

    let assembler = DocumentAssembler::new(&locale, &table, fixture.export_dir(), opts);
    let is_owner = configured_owner("Alice");
    let ctx = assembler.assemble(&mut records, &*is_owner).await;

    let template = Template::compile_named("default.html", DEFAULT_TEMPLATE).unwrap();
    let html = template.render(&ctx.to_value().unwrap());

    assert!(html.contains("<h1>WhatsApp Chat with Bob</h1>"));
    assert!(html.contains("<html lang=\"en\">"));
    assert!(html.contains("message user"));
    assert!(html.contains("message other"));
    assert!(html.contains("src=\"data:image/jpeg;base64,/9j/\""));
    assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    assert!(html.contains("Family archive"));
    assert!(!html.contains("{{"));
}
