// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Faena ordering bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Faena configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FaenaConfig {
    /// Shop identity and ordering-window settings.
    #[serde(default)]
    pub shop: ShopConfig,

    /// Conversation session expiry settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// WhatsApp Business API transport settings.
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Shop identity and ordering-window configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ShopConfig {
    /// Display name of the shop, shown in the welcome message.
    #[serde(default = "default_shop_name")]
    pub name: String,

    /// How many days ahead customers may book (dates strictly after today).
    #[serde(default = "default_days_ahead")]
    pub days_ahead: u32,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            name: default_shop_name(),
            days_ahead: default_days_ahead(),
            log_level: default_log_level(),
        }
    }
}

fn default_shop_name() -> String {
    "Carnicería Faena".to_string()
}

fn default_days_ahead() -> u32 {
    21
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Conversation session expiry configuration.
///
/// The warning/timeout pair is the user-visible idle mechanism evaluated
/// on each inbound event; the TTL is a store-level backstop against
/// process restarts. They overlap by design and are never conflated.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Idle seconds before the "still there?" warning fires.
    #[serde(default = "default_warning_secs")]
    pub warning_secs: u64,

    /// Idle seconds before the session expires.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Store-level time-to-live for session records.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            warning_secs: default_warning_secs(),
            timeout_secs: default_timeout_secs(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_warning_secs() -> u64 {
    5 * 60
}

fn default_timeout_secs() -> u64 {
    8 * 60
}

fn default_ttl_secs() -> u64 {
    15 * 60
}

/// WhatsApp Business API transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsAppConfig {
    /// Base URL of the WhatsApp provider API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Provider API key. `None` disables outbound sending.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Shared secret echoed back during webhook verification.
    #[serde(default)]
    pub verify_token: Option<String>,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            verify_token: None,
        }
    }
}

fn default_api_url() -> String {
    "https://waba-v2.360dialog.io".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("faena").join("faena.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "faena.db".to_string())
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Public base URL used to build the QR image link sent to customers.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: default_public_url(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_public_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_thresholds() {
        let config = FaenaConfig::default();
        assert_eq!(config.shop.days_ahead, 21);
        assert_eq!(config.session.warning_secs, 300);
        assert_eq!(config.session.timeout_secs, 480);
        assert_eq!(config.session.ttl_secs, 900);
        assert_eq!(config.gateway.port, 3000);
        assert!(config.whatsapp.api_key.is_none());
    }

    #[test]
    fn config_serializes_back_to_toml() {
        let config = FaenaConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("[shop]"));
        assert!(toml.contains("[session]"));
        assert!(toml.contains("[gateway]"));
    }
}
