// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `chatscribe cache stats` command implementation.

use std::path::Path;

use chatscribe_cache::EntryStore;
use chatscribe_core::ScribeError;
use serde::Serialize;

/// Structured output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub dir: String,
    pub entries: u64,
    pub total_bytes: u64,
    pub total_human: String,
}

/// Formats a byte count with a binary unit.
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

pub async fn run_stats(cache_dir: &Path, json: bool) -> Result<(), ScribeError> {
    let stats = EntryStore::new(cache_dir).stats().await?;
    let response = StatsResponse {
        dir: cache_dir.display().to_string(),
        entries: stats.entries,
        total_bytes: stats.total_bytes,
        total_human: format_bytes(stats.total_bytes),
    };

    if json {
        let body = serde_json::to_string_pretty(&response)
            .map_err(|e| ScribeError::Internal(format!("failed to encode stats: {e}")))?;
        println!("{body}");
    } else {
        println!("  cache:   {}", response.dir);
        println!("  entries: {}", response.entries);
        println!("  size:    {}", response.total_human);
    }
    Ok(())
}
