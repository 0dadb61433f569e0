// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat export parser.
//!
//! Reconstructs logical messages from an exported chat text file. Layouts are
//! never hard-coded: a [`PatternTable`] is compiled from a locale's header
//! formats and attachment marker and handed to the parser, so exports in
//! different locales can be parsed side by side.

pub mod line;
pub mod parser;
pub mod patterns;

pub use line::{classify, Header, Line};
pub use parser::{parse, ExportParser, Manifest, ParseOutcome};
pub use patterns::{HeaderMatcher, PatternTable};
