// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Faena ordering bot.
//!
//! Layered loading via Figment (defaults, system file, XDG file, local
//! file, environment), strict unknown-key rejection, and miette-rendered
//! diagnostics with fuzzy key suggestions.

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, figment_to_config_errors, render_errors, suggest_key};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    FaenaConfig, GatewayConfig, SessionConfig, ShopConfig, StorageConfig, WhatsAppConfig,
};
pub use validation::validate_config;

/// Load configuration from the XDG hierarchy and validate it.
///
/// Returns every deserialization and validation problem found so the
/// caller can render them all at once and exit.
pub fn load_and_validate() -> Result<FaenaConfig, Vec<ConfigError>> {
    let config = load_config().map_err(figment_to_config_errors)?;
    let errors = validate_config(&config);
    if errors.is_empty() {
        Ok(config)
    } else {
        Err(errors)
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<FaenaConfig, Vec<ConfigError>> {
    let config = load_config_from_str(toml_content).map_err(figment_to_config_errors)?;
    let errors = validate_config(&config);
    if errors.is_empty() {
        Ok(config)
    } else {
        Err(errors)
    }
}
