// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading.
//!
//! Files are read from `/etc/chatscribe/chatscribe.toml`, then the user config
//! dir, then `./chatscribe.toml`; `CHATSCRIBE_*` variables win over all three.

#![allow(clippy::result_large_err)]

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;

use crate::model::ScribeConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/chatscribe/chatscribe.toml";

/// Local configuration file, relative to the working directory.
pub const LOCAL_CONFIG_FILE: &str = "chatscribe.toml";

/// Sections that `CHATSCRIBE_<SECTION>_<FIELD>` variables can address.
const ENV_SECTIONS: [&str; 6] = ["general", "transcription", "cache", "locale", "render", "privacy"];

/// Path of the per-user configuration file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("chatscribe").join(LOCAL_CONFIG_FILE))
}

/// Compiled defaults with `files` merged on top, in order.
fn layered<'a>(files: impl IntoIterator<Item = &'a Path>) -> Figment {
    files.into_iter().fold(
        Figment::from(Serialized::defaults(ScribeConfig::default())),
        |figment, path| figment.merge(Toml::file(path)),
    )
}

/// Standard lookup: system file, user file, local file, then environment.
/// Missing files are skipped.
pub fn load_config() -> Result<ScribeConfig, figment::Error> {
    let user = user_config_path();
    let mut files = vec![Path::new(SYSTEM_CONFIG_PATH)];
    files.extend(user.as_deref());
    files.push(Path::new(LOCAL_CONFIG_FILE));

    layered(files).merge(env_provider()).extract()
}

/// Parses `toml_content` over the defaults. Neither files nor the
/// environment are consulted.
pub fn load_config_from_str(toml_content: &str) -> Result<ScribeConfig, figment::Error> {
    Figment::from(Serialized::defaults(ScribeConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Loads one explicit file in place of the hierarchy. Environment overrides
/// still apply.
pub fn load_config_from_path(path: &Path) -> Result<ScribeConfig, figment::Error> {
    layered([path]).merge(env_provider()).extract()
}

/// `CHATSCRIBE_TRANSCRIPTION_API_KEY_ENV` becomes `transcription.api_key_env`:
/// only the first underscore after a known section name is a separator.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("CHATSCRIBE_").map(|key| {
        let name = key.as_str().to_ascii_lowercase();
        ENV_SECTIONS
            .iter()
            .find_map(|section| {
                name.strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|field| format!("{section}.{field}"))
            })
            .unwrap_or(name)
            .into()
    })
}
