// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-document pipeline: locate, parse, assemble, render, write.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use chatscribe_assembler::{
    chat_title, configured_owner, detect_owner, AssemblyOptions, DocumentAssembler, ImagePolicy,
    TranscriptionSettings, DEFAULT_TEMPLATE,
};
use chatscribe_cache::TranscriptionCache;
use chatscribe_config::{Locale, ScribeConfig};
use chatscribe_core::ScribeError;
use chatscribe_parser::{ExportParser, Manifest, PatternTable};
use chatscribe_template::Template;
use tracing::{debug, info, warn};

const CHAT_EXTENSION: &str = "txt";
const IOS_CHAT_FILE: &str = "_chat.txt";
const OUTPUT_SUFFIX: &str = "_transcript.html";

/// One document to render.
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub export_dir: PathBuf,
    /// Defaults to [`default_output_path`].
    pub output: Option<PathBuf>,
    /// Overrides `transcription.language`.
    pub language: Option<String>,
    pub transcribe: bool,
}

impl RenderJob {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
            output: None,
            language: None,
            transcribe: true,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.export_dir))
    }
}

/// Everything shared between the documents of a run.
pub struct Renderer<'c> {
    config: &'c ScribeConfig,
    locale: Locale,
    patterns: PatternTable,
    template: Template,
    cache: Option<TranscriptionCache>,
}

impl<'c> Renderer<'c> {
    pub fn new(
        config: &'c ScribeConfig,
        locale: Locale,
        template: Template,
        cache: Option<TranscriptionCache>,
    ) -> Result<Self, ScribeError> {
        let patterns = PatternTable::new(
            &locale.patterns.attached_file,
            &locale.patterns.header_formats,
        )?;
        Ok(Self {
            config,
            locale,
            patterns,
            template,
            cache,
        })
    }

    /// Renders one export and returns the path written.
    pub async fn render(&self, job: &RenderJob) -> Result<PathBuf, ScribeError> {
        let export_dir = job.export_dir.as_path();
        if !export_dir.is_dir() {
            return Err(ScribeError::Export(format!(
                "{} is not a directory",
                export_dir.display()
            )));
        }

        let chat_file = find_chat_file(export_dir).await?;
        let bytes = tokio::fs::read(&chat_file)
            .await
            .map_err(|e| ScribeError::io(&chat_file, e))?;
        let raw = decode_chat(&bytes, &chat_file);
        let manifest = read_manifest(export_dir, &chat_file).await?;
        debug!(chat = %chat_file.display(), files = manifest.len(), "read export");

        let outcome = ExportParser::new(&self.patterns).parse(&raw, &manifest);
        let mut records = outcome.records;

        let title = document_title(export_dir, &chat_file);
        let is_owner = match &self.config.render.user_name {
            Some(name) => configured_owner(name.clone()),
            None => detect_owner(&title, &self.locale.patterns.chat_title_prefix, &records),
        };

        let options = AssemblyOptions {
            chat_title: title,
            footer_text: self.config.render.footer_text.clone(),
            show_stats: self.config.render.show_stats,
            images: ImagePolicy {
                embed: self.config.render.embed_images,
                exclude: self.config.privacy.exclude_images,
            },
        };
        let mut assembler = DocumentAssembler::new(&self.locale, &self.patterns, export_dir, options);
        if let (true, Some(cache)) = (job.transcribe, self.cache.as_ref()) {
            let language = job
                .language
                .clone()
                .or_else(|| self.config.transcription.language.clone());
            assembler = assembler.with_transcription(
                cache,
                TranscriptionSettings {
                    model: self.config.transcription.model.clone(),
                    language,
                },
            );
        }

        let context = assembler.assemble(&mut records, &*is_owner).await;
        let html = self.template.render(&context.to_value()?);

        let output = job.output_path();
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ScribeError::io(parent, e))?;
        }
        tokio::fs::write(&output, html)
            .await
            .map_err(|e| ScribeError::io(&output, e))?;

        info!(
            export = %export_dir.display(),
            output = %output.display(),
            messages = records.len(),
            discarded_lines = outcome.discarded_lines,
            "rendered transcript"
        );
        Ok(output)
    }
}

/// Compiles the configured template, or the bundled one.
///
/// Syntax errors are rendered as a full diagnostic report.
pub fn load_template(path: Option<&Path>) -> Result<Template, ScribeError> {
    let Some(path) = path else {
        return Template::compile_named("default.html", DEFAULT_TEMPLATE)
            .map_err(|e| ScribeError::Template(e.render_report()));
    };
    let source = std::fs::read_to_string(path).map_err(|e| ScribeError::io(path, e))?;
    Template::compile_named(&path.display().to_string(), &source)
        .map_err(|e| ScribeError::Template(e.render_report()))
}

/// `<parent>/<export_dir_name>_transcript.html`.
pub fn default_output_path(export_dir: &Path) -> PathBuf {
    let absolute = std::path::absolute(export_dir).unwrap_or_else(|_| export_dir.to_path_buf());
    let name = absolute
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chat".to_string());
    absolute.with_file_name(format!("{name}{OUTPUT_SUFFIX}"))
}

/// Picks the chat text file of an export.
///
/// Preference: a `.txt` named after the directory, then the iOS
/// `_chat.txt`, then the first `.txt` in name order.
pub async fn find_chat_file(export_dir: &Path) -> Result<PathBuf, ScribeError> {
    let mut candidates: Vec<PathBuf> = list_files(export_dir)
        .await?
        .into_iter()
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(CHAT_EXTENSION))
        })
        .collect();
    candidates.sort();

    let dir_name = export_dir.file_name();
    if let Some(pos) = candidates.iter().position(|p| p.file_stem() == dir_name) {
        return Ok(candidates.swap_remove(pos));
    }
    if let Some(pos) = candidates
        .iter()
        .position(|p| p.file_name().is_some_and(|n| n == IOS_CHAT_FILE))
    {
        return Ok(candidates.swap_remove(pos));
    }
    candidates.into_iter().next().ok_or_else(|| {
        ScribeError::Export(format!("no chat text file in {}", export_dir.display()))
    })
}

/// Names of the files next to the chat text, excluding the chat text itself.
pub async fn read_manifest(export_dir: &Path, chat_file: &Path) -> Result<Manifest, ScribeError> {
    Ok(list_files(export_dir)
        .await?
        .into_iter()
        .filter(|p| p != chat_file)
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
        .collect())
}

async fn list_files(dir: &Path) -> Result<Vec<PathBuf>, ScribeError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| ScribeError::io(dir, e))?;
    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ScribeError::io(dir, e))?
    {
        let is_file = entry
            .file_type()
            .await
            .map(|t| t.is_file())
            .unwrap_or(false);
        if is_file {
            files.push(entry.path());
        }
    }
    Ok(files)
}

/// iOS exports name the text `_chat.txt`; their directory carries the title.
fn document_title(export_dir: &Path, chat_file: &Path) -> String {
    let title = chat_title(chat_file);
    if title.starts_with('_') {
        if let Some(name) = export_dir.file_name() {
            return name.to_string_lossy().into_owned();
        }
    }
    title
}

/// Decodes the chat text, replacing invalid UTF-8 so one bad byte costs a
/// character rather than the document.
fn decode_chat(bytes: &[u8], chat_file: &Path) -> String {
    let text = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = text {
        warn!(chat = %chat_file.display(), "chat text is not valid UTF-8, invalid bytes replaced");
    }
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chatscribe_config::load_and_validate_str;
    use chatscribe_config::locale::bundled_locale;
    use chatscribe_test_utils::{ExportFixture, MockTranscriber};

    use super::*;

    const TITLE: &str = "WhatsApp Chat with Bob";

    fn fixture() -> ExportFixture {
        ExportFixture::builder(TITLE)
            .line("3/1/24, 10:05 - Alice: IMG-01.jpg (file attached)")
            .line("see you there")
            .line("3/1/24, 10:06 - Bob: PTT-20240301-WA0001.opus (file attached)")
            .media("IMG-01.jpg", b"\xff\xd8\xff")
            .media("PTT-20240301-WA0001.opus", b"OggS")
            .build()
            .unwrap()
    }

    fn config() -> ScribeConfig {
        load_and_validate_str("").unwrap()
    }

    #[tokio::test]
    async fn renders_next_to_the_export() {
        let fixture = fixture();
        let config = config();
        let cache_dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockTranscriber::with_responses(vec!["on my way".into()]));
        let cache = TranscriptionCache::new(cache_dir.path(), mock.clone());
        let renderer = Renderer::new(
            &config,
            bundled_locale("en").unwrap(),
            load_template(None).unwrap(),
            Some(cache),
        )
        .unwrap();

        let output = renderer
            .render(&RenderJob::new(fixture.export_dir()))
            .await
            .unwrap();

        assert_eq!(
            output,
            fixture.parent_dir().join(format!("{TITLE}_transcript.html"))
        );
        let html = std::fs::read_to_string(&output).unwrap();
        assert!(html.contains("on my way"));
        assert!(html.contains("see you there"));
        assert!(html.contains(TITLE));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn no_transcribe_skips_the_transcriber() {
        let fixture = fixture();
        let config = config();
        let cache_dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockTranscriber::new());
        let cache = TranscriptionCache::new(cache_dir.path(), mock.clone());
        let renderer = Renderer::new(
            &config,
            bundled_locale("en").unwrap(),
            load_template(None).unwrap(),
            Some(cache),
        )
        .unwrap();

        let out_dir = tempfile::tempdir().unwrap();
        let job = RenderJob {
            output: Some(out_dir.path().join("nested").join("out.html")),
            transcribe: false,
            ..RenderJob::new(fixture.export_dir())
        };
        let output = renderer.render(&job).await.unwrap();

        assert!(output.is_file());
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn invalid_utf8_in_one_message_still_renders() {
        let fixture = fixture();
        let mut raw = b"3/1/24, 10:05 - Alice: first\n3/1/24, 10:06 - Bob: caf".to_vec();
        raw.push(0xE9);
        raw.extend_from_slice(b"\n3/1/24, 10:07 - Alice: last\n");
        std::fs::write(fixture.chat_file(), raw).unwrap();

        let config = config();
        let renderer = Renderer::new(
            &config,
            bundled_locale("en").unwrap(),
            load_template(None).unwrap(),
            None,
        )
        .unwrap();
        let output = renderer
            .render(&RenderJob::new(fixture.export_dir()))
            .await
            .unwrap();

        let html = std::fs::read_to_string(&output).unwrap();
        assert!(html.contains("first"));
        assert!(html.contains("caf\u{FFFD}"));
        assert!(html.contains("last"));
    }

    #[test]
    fn decode_chat_replaces_invalid_bytes() {
        let path = Path::new("chat.txt");
        assert_eq!(decode_chat(b"ok", path), "ok");
        assert_eq!(decode_chat(b"caf\xE9", path), "caf\u{FFFD}");
    }

    #[tokio::test]
    async fn missing_chat_file_is_an_export_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("IMG-01.jpg"), b"x").unwrap();
        assert!(matches!(
            find_chat_file(dir.path()).await,
            Err(ScribeError::Export(_))
        ));
    }

    #[tokio::test]
    async fn chat_file_preference() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("WhatsApp Chat with Carol");
        std::fs::create_dir(&export).unwrap();
        std::fs::write(export.join("notes.txt"), b"").unwrap();
        std::fs::write(export.join("_chat.txt"), b"").unwrap();
        assert_eq!(find_chat_file(&export).await.unwrap(), export.join("_chat.txt"));

        std::fs::write(export.join("WhatsApp Chat with Carol.txt"), b"").unwrap();
        assert_eq!(
            find_chat_file(&export).await.unwrap(),
            export.join("WhatsApp Chat with Carol.txt")
        );

        let manifest = read_manifest(&export, &export.join("_chat.txt")).await.unwrap();
        assert!(manifest.contains("notes.txt"));
        assert!(!manifest.contains("_chat.txt"));
    }

    #[test]
    fn ios_title_comes_from_the_directory() {
        let dir = Path::new("/exports/WhatsApp Chat - Dave");
        assert_eq!(
            document_title(dir, &dir.join("_chat.txt")),
            "WhatsApp Chat - Dave"
        );
    }

    #[test]
    fn template_syntax_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.html");
        std::fs::write(&path, "{{#if show_stats}}never closed").unwrap();
        match load_template(Some(&path)) {
            Err(ScribeError::Template(report)) => assert!(report.contains("unclosed")),
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("template should not compile"),
        }
    }
}
