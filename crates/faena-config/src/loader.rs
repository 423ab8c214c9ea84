// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./faena.toml` > `~/.config/faena/faena.toml`
//! > `/etc/faena/faena.toml` with environment variable overrides via the
//! `FAENA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::FaenaConfig;

/// Top-level config section names, used to map env var prefixes to keys.
const SECTIONS: [&str; 5] = ["shop", "session", "whatsapp", "storage", "gateway"];

/// Compiled defaults as the base layer of every figment.
fn defaults() -> Figment {
    Figment::from(Serialized::defaults(FaenaConfig::default()))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/faena/faena.toml` (system-wide)
/// 3. `~/.config/faena/faena.toml` (user XDG config)
/// 4. `./faena.toml` (local directory)
/// 5. `FAENA_*` environment variables
pub fn load_config() -> Result<FaenaConfig, figment::Error> {
    defaults()
        .merge(Toml::file("/etc/faena/faena.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("faena/faena.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("faena.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<FaenaConfig, figment::Error> {
    defaults().merge(Toml::string(toml_content)).extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FaenaConfig, figment::Error> {
    defaults()
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `FAENA_WHATSAPP_API_KEY` must map to
/// `whatsapp.api_key`, not `whatsapp.api.key`.
fn env_provider() -> Env {
    Env::prefixed("FAENA_").map(|key| map_env_key(key.as_str()).into())
}

/// Turn a prefix-stripped env var name into a dotted config key:
/// `whatsapp_api_key` becomes `whatsapp.api_key`. Names outside the known
/// sections pass through unchanged and fail as unknown keys later.
fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section)
            && let Some(rest) = rest.strip_prefix('_')
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
