// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits implemented outside the core.

pub mod transcriber;

pub use transcriber::Transcriber;
