// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for chatscribe integration tests.
//!
//! # Components
//!
//! - [`MockTranscriber`] - scripted transcriber that counts its invocations
//! - [`ExportFixture`] - an extracted chat export laid out in a temp directory

pub mod fixture;
pub mod mock_transcriber;

pub use fixture::{ExportFixture, ExportFixtureBuilder};
pub use mock_transcriber::MockTranscriber;
