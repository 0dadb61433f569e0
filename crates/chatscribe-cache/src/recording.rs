// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade; without an installed recorder these are no-ops.

use metrics::describe_counter;

/// Register the cache metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        "chatscribe_cache_hits_total",
        "Transcripts served from the cache"
    );
    describe_counter!(
        "chatscribe_cache_misses_total",
        "Transcripts computed because no entry existed"
    );
    describe_counter!(
        "chatscribe_transcription_failures_total",
        "Transcriber invocations that failed"
    );
}

pub fn record_hit(model: &str) {
    metrics::counter!("chatscribe_cache_hits_total", "model" => model.to_string()).increment(1);
}

pub fn record_miss(model: &str) {
    metrics::counter!("chatscribe_cache_misses_total", "model" => model.to_string()).increment(1);
}

pub fn record_failure(model: &str) {
    metrics::counter!("chatscribe_transcription_failures_total", "model" => model.to_string())
        .increment(1);
}
