// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal mustache-style template engine.
//!
//! Supports `{{path}}` interpolation, `{{#if}}` / `{{#unless}}` with an
//! optional `{{else}}`, and `{{#each}}` iteration over arrays, evaluated
//! against a [`serde_json::Value`] context. Output is never escaped; callers
//! escape the values they put in the context.
//!
//! ```
//! use serde_json::json;
//!
//! let out = chatscribe_template::render(
//!     "{{#each people}}{{this.name}} {{/each}}",
//!     &json!({ "people": [{ "name": "Alice" }, { "name": "Bob" }] }),
//! )
//! .unwrap();
//! assert_eq!(out, "Alice Bob ");
//! ```

pub mod error;
mod parse;
mod render;

use serde_json::Value;
use tracing::debug;

pub use error::TemplateError;
pub use render::is_truthy;

/// A compiled template, renderable against any number of contexts.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    nodes: Vec<parse::Node>,
}

impl Template {
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        Self::compile_named("template", source)
    }

    /// Like [`Template::compile`]; `name` labels diagnostics (usually a path).
    pub fn compile_named(name: &str, source: &str) -> Result<Self, TemplateError> {
        let nodes = parse::compile(name, source)?;
        debug!(template = name, nodes = nodes.len(), "compiled template");
        Ok(Self {
            name: name.to_string(),
            nodes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unknown variables render as empty strings.
    pub fn render(&self, context: &Value) -> String {
        render::render(&self.nodes, context)
    }
}

/// Compiles and renders in one step.
pub fn render(source: &str, context: &Value) -> Result<String, TemplateError> {
    Ok(Template::compile(source)?.render(context))
}
