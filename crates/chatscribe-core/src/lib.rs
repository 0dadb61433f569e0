// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for chatscribe.
//!
//! Holds the message data model, the shared error type, and the adapter
//! traits that connect the parser/cache/assembler pipeline to external
//! collaborators such as speech-to-text backends.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ScribeError;
pub use traits::Transcriber;
pub use types::{
    Attachment, AttachmentKind, DateOrder, HeaderFormatSpec, MessageRecord, Transcript,
    TranscriptionRequest,
};
