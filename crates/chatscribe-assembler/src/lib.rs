// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document assembly.
//!
//! Consumes parsed [`MessageRecord`](chatscribe_core::MessageRecord)s,
//! transcribes audio through the cache, and produces the [`RenderContext`]
//! that the template engine renders. Ownership of messages comes from an
//! injected predicate; see [`owner`].

pub mod assemble;
pub mod media;
pub mod owner;
pub mod text;
pub mod view;

pub use assemble::{chat_title, AssemblyOptions, DocumentAssembler, TranscriptionSettings};
pub use media::ImagePolicy;
pub use owner::{configured_owner, detect_owner, no_owner, OwnerPredicate};
pub use text::escape_html;
pub use view::{MediaView, MessageView, RenderContext};

/// The bundled HTML template.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/default.html");
