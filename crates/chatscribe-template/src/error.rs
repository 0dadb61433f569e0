// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Template compilation errors.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum TemplateError {
    /// The template is structurally invalid.
    #[error("template syntax error at line {line}, column {column}: {message}")]
    #[diagnostic(code(chatscribe::template::syntax))]
    Syntax {
        message: String,
        /// 1-based.
        line: usize,
        /// 1-based, in characters.
        column: usize,
        #[label("{message}")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },
}

impl TemplateError {
    pub(crate) fn syntax(
        name: &str,
        source: &str,
        offset: usize,
        len: usize,
        message: impl Into<String>,
    ) -> Self {
        let (line, column) = line_column(source, offset);
        Self::Syntax {
            message: message.into(),
            line,
            column,
            span: (offset, len).into(),
            src: NamedSource::new(name, source.to_string()),
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Self::Syntax { line, .. } => *line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            Self::Syntax { column, .. } => *column,
        }
    }

    /// Renders the error with source context, for terminal output.
    pub fn render_report(&self) -> String {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = self;
        if GraphicalReportHandler::new()
            .render_report(&mut buf, diagnostic)
            .is_err()
        {
            return self.to_string();
        }
        buf
    }
}

fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset.min(source.len())];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(nl) => before[nl + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    (line, column)
}
