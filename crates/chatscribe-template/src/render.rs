// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Evaluation of a compiled node tree against a JSON context.

use serde_json::Value;

use crate::parse::{Node, Path};

/// Absent, null, `""`, `[]` and `false` are falsy; everything else,
/// including `{}` and `0`, is truthy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Number(_)) | Some(Value::Object(_)) => true,
    }
}

fn display(value: Option<&Value>, out: &mut String) {
    match value {
        Some(Value::String(s)) => out.push_str(s),
        Some(Value::Number(n)) => out.push_str(&n.to_string()),
        Some(Value::Bool(b)) => out.push_str(if *b { "true" } else { "false" }),
        _ => {}
    }
}

fn walk<'v>(mut value: &'v Value, segments: &[String]) -> Option<&'v Value> {
    for segment in segments {
        value = match value {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(value)
}

/// Scopes from the root (first) to the innermost loop item (last).
struct Scopes<'v> {
    stack: Vec<&'v Value>,
}

impl<'v> Scopes<'v> {
    fn resolve(&self, path: &Path) -> Option<&'v Value> {
        if path.this {
            let current = *self.stack.last()?;
            return walk(current, &path.segments);
        }
        self.stack
            .iter()
            .rev()
            .copied()
            .find_map(|scope| walk(scope, &path.segments))
    }
}

pub(crate) fn render(nodes: &[Node], context: &Value) -> String {
    let mut scopes = Scopes {
        stack: vec![context],
    };
    let mut out = String::new();
    render_nodes(nodes, &mut scopes, &mut out);
    out
}

fn render_nodes<'v>(nodes: &[Node], scopes: &mut Scopes<'v>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(path) => display(scopes.resolve(path), out),
            Node::Cond {
                path,
                negate,
                then,
                otherwise,
            } => {
                let truthy = is_truthy(scopes.resolve(path)) != *negate;
                render_nodes(if truthy { then } else { otherwise }, scopes, out);
            }
            Node::Each { path, body } => {
                let Some(Value::Array(items)) = scopes.resolve(path) else {
                    continue;
                };
                for item in items {
                    scopes.stack.push(item);
                    render_nodes(body, scopes, out);
                    scopes.stack.pop();
                }
            }
        }
    }
}
