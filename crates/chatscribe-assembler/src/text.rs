// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTML escaping and display text cleanup.

use regex::Regex;

/// Escapes the five HTML-significant characters.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Body text as shown to the reader: attachment references removed and
/// surrounding blank space trimmed.
pub fn display_text(body: &[String], marker: &Regex, filename: Option<&str>) -> String {
    let lines: Vec<String> = body
        .iter()
        .map(|line| {
            let line = strip_marker(line, marker, filename);
            match filename {
                Some(name) => strip_file_token(&line, name),
                None => line,
            }
        })
        .collect();
    lines.join("\n").trim().to_string()
}

/// Removes every marker reference. When the resolved name has spaces the
/// regex only covers its last word, so the removal extends back over the
/// rest of the name.
fn strip_marker(line: &str, marker: &Regex, filename: Option<&str>) -> String {
    let mut out = String::with_capacity(line.len());
    let mut last = 0;
    for caps in marker.captures_iter(line) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let mut start = whole.start();
        if let (Some(name), Some(file)) = (filename, caps.name("file")) {
            if let Some(prefix) = name.strip_suffix(file.as_str()) {
                let head = &line[..file.start()];
                if !prefix.is_empty() && head.ends_with(prefix) {
                    start = file.start() - prefix.len();
                }
            }
        }
        let kept = &line[last..start.max(last)];
        out.push_str(kept.trim_end_matches(['\u{200E}', '\u{200F}']));
        last = whole.end();
    }
    out.push_str(&line[last..]);
    out
}

/// Drops a `<attached: NAME>` style token naming `name`.
fn strip_file_token(line: &str, name: &str) -> String {
    if !line.contains(name) {
        return line.to_string();
    }
    let tokens: Vec<&str> = line.split(' ').collect();
    let mut kept: Vec<&str> = Vec::with_capacity(tokens.len());
    for token in tokens {
        let bare = token.trim_matches(|c: char| "<>()[]\"',:;\u{200E}\u{200F}".contains(c));
        if bare == name {
            // An `<attached:` prefix belongs to the same reference.
            if kept
                .last()
                .is_some_and(|prev| prev.trim_start_matches('\u{200E}').starts_with('<') && prev.ends_with(':'))
            {
                kept.pop();
            }
            continue;
        }
        kept.push(token);
    }
    kept.join(" ")
}
