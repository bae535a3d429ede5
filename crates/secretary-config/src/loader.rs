// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! `./secretary.toml` > `~/.config/secretary/secretary.toml` >
//! `/etc/secretary/secretary.toml`, with `SECRETARY_*` environment
//! variables on top.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SecretaryConfig;

pub const SYSTEM_CONFIG: &str = "/etc/secretary/secretary.toml";
pub const LOCAL_CONFIG: &str = "secretary.toml";

/// Top-level sections, used to turn `SECRETARY_<SECTION>_<KEY>` into
/// `<section>.<key>`.
const SECTIONS: [&str; 7] = [
    "agent", "telegram", "openai", "notion", "storage", "gateway", "workflow",
];

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("secretary").join(LOCAL_CONFIG))
}

/// Load configuration from the standard hierarchy.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/secretary/secretary.toml`
/// 3. `~/.config/secretary/secretary.toml`
/// 4. `./secretary.toml`
/// 5. `SECRETARY_*` environment variables
pub fn load_config() -> Result<SecretaryConfig, figment::Error> {
    build_figment().extract()
}

/// Defaults plus a TOML string. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<SecretaryConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SecretaryConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Defaults, one explicit file, then environment overrides.
pub fn load_config_from_path(path: &Path) -> Result<SecretaryConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SecretaryConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The full hierarchy before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SecretaryConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// Uses `map()` rather than `split("_")` so that
/// `SECRETARY_TELEGRAM_BOT_TOKEN` lands on `telegram.bot_token`, not
/// `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("SECRETARY_").map(|key| map_env_key(key.as_str()).into())
}

/// Figment passes the key with the prefix stripped but the case intact.
pub(crate) fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}
