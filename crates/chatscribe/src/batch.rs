// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `chatscribe batch`: render several exports, isolating failures.

use std::path::PathBuf;

use tracing::{error, info};

use crate::pipeline::{RenderJob, Renderer};

/// Per-run counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub rendered: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Renders `export_dirs` one after another, in order.
///
/// With `skip_existing`, exports whose default output already exists are
/// left alone.
pub async fn run_batch(
    renderer: &Renderer<'_>,
    export_dirs: &[PathBuf],
    language: Option<&str>,
    skip_existing: bool,
) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for (index, export_dir) in export_dirs.iter().enumerate() {
        let job = RenderJob {
            language: language.map(str::to_string),
            ..RenderJob::new(export_dir)
        };
        let position = index + 1;

        if skip_existing && job.output_path().exists() {
            info!(
                position,
                total = export_dirs.len(),
                export = %export_dir.display(),
                "output exists, skipping"
            );
            summary.skipped += 1;
            continue;
        }

        match renderer.render(&job).await {
            Ok(output) => {
                info!(
                    position,
                    total = export_dirs.len(),
                    export = %export_dir.display(),
                    output = %output.display(),
                    "document rendered"
                );
                summary.rendered += 1;
            }
            Err(e) => {
                error!(
                    position,
                    total = export_dirs.len(),
                    export = %export_dir.display(),
                    error = %e,
                    "document failed"
                );
                summary.failed += 1;
            }
        }
    }

    summary
}
