// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Speech-to-text adapters implementing [`Transcriber`].

pub mod command;
pub mod http;

use std::sync::Arc;
use std::time::Duration;

use chatscribe_config::model::{TranscriberBackend, TranscriptionConfig};
use chatscribe_core::{ScribeError, Transcriber};
use tracing::{info, warn};

pub use command::CommandTranscriber;
pub use http::HttpTranscriber;

/// Builds the transcriber selected by the configuration.
pub fn from_config(config: &TranscriptionConfig) -> Result<Arc<dyn Transcriber>, ScribeError> {
    let timeout = Duration::from_secs(config.timeout_secs);
    match config.backend {
        TranscriberBackend::Http => {
            let api_key = std::env::var(&config.api_key_env)
                .ok()
                .filter(|k| !k.trim().is_empty());
            if api_key.is_none() {
                warn!(
                    env = %config.api_key_env,
                    "no API key in environment, sending unauthenticated requests"
                );
            }
            info!(endpoint = %config.endpoint, model = %config.model, "using HTTP transcriber");
            Ok(Arc::new(HttpTranscriber::new(
                config.endpoint.clone(),
                api_key,
                timeout,
            )?))
        }
        TranscriberBackend::Command => {
            let program = config.command.clone().ok_or_else(|| {
                ScribeError::Config("transcription.command is required for the command backend".into())
            })?;
            info!(program = %program, model = %config.model, "using command transcriber");
            Ok(Arc::new(CommandTranscriber::new(
                program,
                config.args.clone(),
                timeout,
            )))
        }
    }
}
