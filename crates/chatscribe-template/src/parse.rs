// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Template compilation: directive scanning and block matching.
//!
//! Blocks are matched with an explicit stack of open scopes. Each scope
//! remembers its kind and where it was opened so that mismatches and
//! unclosed blocks point at the right place.

use std::fmt;

use crate::error::TemplateError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A dotted accessor. `this` as the first segment anchors it to the
/// innermost scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Path {
    pub(crate) this: bool,
    pub(crate) segments: Vec<String>,
}

impl Path {
    fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split('.');
        let mut this = false;
        let mut segments = Vec::new();
        if let Some(first) = parts.next() {
            if first == "this" {
                this = true;
            } else {
                segments.push(first);
            }
        }
        segments.extend(parts);
        if segments.iter().any(|s| s.is_empty() || s.chars().any(char::is_whitespace)) {
            return None;
        }
        Some(Self {
            this,
            segments: segments.into_iter().map(str::to_string).collect(),
        })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.this, self.segments.is_empty()) {
            (true, true) => f.write_str("this"),
            (true, false) => write!(f, "this.{}", self.segments.join(".")),
            (false, _) => f.write_str(&self.segments.join(".")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Text(String),
    Var(Path),
    Cond {
        path: Path,
        negate: bool,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
    Each {
        path: Path,
        body: Vec<Node>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    If,
    Unless,
    Each,
}

impl BlockKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "if" => Some(Self::If),
            "unless" => Some(Self::Unless),
            "each" => Some(Self::Each),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::If => "if",
            Self::Unless => "unless",
            Self::Each => "each",
        }
    }
}

struct Scope {
    kind: BlockKind,
    path: Path,
    then: Vec<Node>,
    otherwise: Option<Vec<Node>>,
    /// Byte offset and length of the opening directive.
    opened_at: (usize, usize),
}

impl Scope {
    fn target(&mut self) -> &mut Vec<Node> {
        match self.otherwise.as_mut() {
            Some(otherwise) => otherwise,
            None => &mut self.then,
        }
    }

    fn into_node(self) -> Node {
        match self.kind {
            BlockKind::Each => Node::Each {
                path: self.path,
                body: self.then,
            },
            BlockKind::If | BlockKind::Unless => Node::Cond {
                path: self.path,
                negate: self.kind == BlockKind::Unless,
                then: self.then,
                otherwise: self.otherwise.unwrap_or_default(),
            },
        }
    }
}

struct Compiler<'s> {
    name: &'s str,
    source: &'s str,
    root: Vec<Node>,
    stack: Vec<Scope>,
}

impl<'s> Compiler<'s> {
    fn error(&self, offset: usize, len: usize, message: impl Into<String>) -> TemplateError {
        TemplateError::syntax(self.name, self.source, offset, len, message)
    }

    fn push(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(scope) => scope.target().push(node),
            None => self.root.push(node),
        }
    }

    fn directive(&mut self, inner: &str, offset: usize, len: usize) -> Result<(), TemplateError> {
        let inner = inner.trim();

        if let Some(rest) = inner.strip_prefix('#') {
            let (name, arg) = split_directive(rest);
            let kind = BlockKind::from_name(name)
                .ok_or_else(|| self.error(offset, len, format!("unknown block `#{name}`")))?;
            let path = self.path(arg, offset, len)?;
            self.stack.push(Scope {
                kind,
                path,
                then: Vec::new(),
                otherwise: None,
                opened_at: (offset, len),
            });
            return Ok(());
        }

        if let Some(rest) = inner.strip_prefix('/') {
            let name = rest.trim();
            let Some(scope) = self.stack.pop() else {
                return Err(self.error(offset, len, format!("unexpected closer `{{{{/{name}}}}}`")));
            };
            if scope.kind.name() != name {
                return Err(self.error(
                    offset,
                    len,
                    format!(
                        "mismatched closer: expected `{{{{/{}}}}}`, found `{{{{/{name}}}}}`",
                        scope.kind.name()
                    ),
                ));
            }
            let node = scope.into_node();
            self.push(node);
            return Ok(());
        }

        if inner == "else" {
            let (name, source) = (self.name, self.source);
            let fail = |message: &str| TemplateError::syntax(name, source, offset, len, message);
            let Some(scope) = self.stack.last_mut() else {
                return Err(fail("`{{else}}` outside of a block"));
            };
            if scope.kind == BlockKind::Each {
                return Err(fail("`{{else}}` is not allowed inside `{{#each}}`"));
            }
            if scope.otherwise.is_some() {
                return Err(fail("duplicate `{{else}}`"));
            }
            scope.otherwise = Some(Vec::new());
            return Ok(());
        }

        let path = self.path(inner, offset, len)?;
        self.push(Node::Var(path));
        Ok(())
    }

    fn path(&self, raw: &str, offset: usize, len: usize) -> Result<Path, TemplateError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(self.error(offset, len, "empty path"));
        }
        Path::parse(raw).ok_or_else(|| self.error(offset, len, format!("invalid path `{raw}`")))
    }

    fn finish(mut self) -> Result<Vec<Node>, TemplateError> {
        // Report the innermost unclosed block.
        if let Some(scope) = self.stack.pop() {
            let (offset, len) = scope.opened_at;
            return Err(self.error(
                offset,
                len,
                format!("unclosed `{{{{#{}}}}}` block", scope.kind.name()),
            ));
        }
        Ok(self.root)
    }
}

fn split_directive(rest: &str) -> (&str, &str) {
    match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg),
        None => (rest, ""),
    }
}

/// Compiles template source into a node tree.
pub(crate) fn compile(name: &str, source: &str) -> Result<Vec<Node>, TemplateError> {
    let mut compiler = Compiler {
        name,
        source,
        root: Vec::new(),
        stack: Vec::new(),
    };

    let mut pos = 0;
    while let Some(found) = source[pos..].find(OPEN) {
        let open_at = pos + found;
        if open_at > pos {
            compiler.push(Node::Text(source[pos..open_at].to_string()));
        }
        let inner_start = open_at + OPEN.len();
        let Some(close) = source[inner_start..].find(CLOSE) else {
            return Err(compiler.error(open_at, OPEN.len(), "unclosed `{{`"));
        };
        let inner_end = inner_start + close;
        let directive_len = inner_end + CLOSE.len() - open_at;
        compiler.directive(&source[inner_start..inner_end], open_at, directive_len)?;
        pos = inner_end + CLOSE.len();
    }
    if pos < source.len() {
        compiler.push(Node::Text(source[pos..].to_string()));
    }

    compiler.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(source: &str) -> (String, usize) {
        match compile("t", source).unwrap_err() {
            TemplateError::Syntax { message, line, .. } => (message, line),
        }
    }

    #[test]
    fn paths() {
        assert_eq!(
            Path::parse("this.media.filename").unwrap(),
            Path {
                this: true,
                segments: vec!["media".into(), "filename".into()]
            }
        );
        assert_eq!(Path::parse("this").unwrap().to_string(), "this");
        assert!(Path::parse("a..b").is_none());
        assert!(Path::parse("a.").is_none());
    }

    #[test]
    fn builds_nested_tree() {
        let nodes = compile("t", "a{{#each xs}}{{#if this.on}}y{{else}}n{{/if}}{{/each}}b").unwrap();
        assert_eq!(nodes.len(), 3);
        match &nodes[1] {
            Node::Each { body, .. } => match &body[0] {
                Node::Cond {
                    then, otherwise, negate, ..
                } => {
                    assert!(!negate);
                    assert_eq!(then, &vec![Node::Text("y".into())]);
                    assert_eq!(otherwise, &vec![Node::Text("n".into())]);
                }
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn structural_errors() {
        assert_eq!(message("{{#if a}}x").0, "unclosed `{{#if}}` block");
        assert_eq!(message("x {{ y").0, "unclosed `{{`");
        assert_eq!(
            message("{{#if a}}{{/each}}").0,
            "mismatched closer: expected `{{/if}}`, found `{{/each}}`"
        );
        assert_eq!(message("{{/if}}").0, "unexpected closer `{{/if}}`");
        assert_eq!(message("{{#with a}}{{/with}}").0, "unknown block `#with`");
        assert_eq!(message("{{#if}}{{/if}}").0, "empty path");
        assert_eq!(message("{{ }}").0, "empty path");
        assert_eq!(message("{{else}}").0, "`{{else}}` outside of a block");
        assert_eq!(
            message("{{#each a}}{{else}}{{/each}}").0,
            "`{{else}}` is not allowed inside `{{#each}}`"
        );
        assert_eq!(
            message("{{#if a}}{{else}}{{else}}{{/if}}").0,
            "duplicate `{{else}}`"
        );
    }

    #[test]
    fn errors_point_at_the_right_line() {
        assert_eq!(message("line one\n{{#each a}}\n\n{{/if}}").1, 4);
        assert_eq!(message("one\ntwo {{#unless x}}\nthree").1, 2);
    }
}
