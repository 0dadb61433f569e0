// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-disk export fixtures.
//!
//! An `ExportFixture` mimics an extracted chat export: a directory holding
//! `<name>.txt` plus the media files it references.

use std::path::{Path, PathBuf};

use chatscribe_core::ScribeError;
use tempfile::TempDir;

/// Builder for export directories.
pub struct ExportFixtureBuilder {
    name: String,
    chat: String,
    media: Vec<(String, Vec<u8>)>,
}

impl ExportFixtureBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            chat: String::new(),
            media: Vec::new(),
        }
    }

    /// Appends a line to the chat text file.
    pub fn line(mut self, line: &str) -> Self {
        self.chat.push_str(line);
        self.chat.push('\n');
        self
    }

    /// Adds a media file next to the chat text.
    pub fn media(mut self, file_name: &str, bytes: &[u8]) -> Self {
        self.media.push((file_name.to_string(), bytes.to_vec()));
        self
    }

    pub fn build(self) -> Result<ExportFixture, ScribeError> {
        let root = TempDir::new().map_err(|e| ScribeError::io(std::env::temp_dir(), e))?;
        let export_dir = root.path().join(&self.name);
        std::fs::create_dir_all(&export_dir).map_err(|e| ScribeError::io(&export_dir, e))?;

        let chat_file = export_dir.join(format!("{}.txt", self.name));
        std::fs::write(&chat_file, &self.chat).map_err(|e| ScribeError::io(&chat_file, e))?;

        for (file_name, bytes) in &self.media {
            let path = export_dir.join(file_name);
            std::fs::write(&path, bytes).map_err(|e| ScribeError::io(&path, e))?;
        }

        Ok(ExportFixture {
            root,
            export_dir,
            chat_file,
        })
    }
}

/// An extracted export living in a temporary directory.
///
/// The directory is removed when the fixture is dropped.
pub struct ExportFixture {
    root: TempDir,
    export_dir: PathBuf,
    chat_file: PathBuf,
}

impl ExportFixture {
    /// Starts a fixture whose directory and text file are named `name`.
    pub fn builder(name: &str) -> ExportFixtureBuilder {
        ExportFixtureBuilder::new(name)
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn chat_file(&self) -> &Path {
        &self.chat_file
    }

    /// Directory containing the export, where rendered output lands.
    pub fn parent_dir(&self) -> &Path {
        self.root.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_chat_and_media() {
        let fixture = ExportFixture::builder("WhatsApp Chat with Alice")
            .line("3/1/24, 10:05 - Alice: hi")
            .media("PTT-1.opus", b"OggS")
            .build()
            .unwrap();

        let chat = std::fs::read_to_string(fixture.chat_file()).unwrap();
        assert_eq!(chat, "3/1/24, 10:05 - Alice: hi\n");
        assert!(fixture.export_dir().join("PTT-1.opus").is_file());
        assert!(fixture.export_dir().starts_with(fixture.parent_dir()));
    }
}
