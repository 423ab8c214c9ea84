// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic validation for loaded configuration.
//!
//! Runs after deserialization and collects every violation instead of
//! stopping at the first, so operators can fix a config file in one pass.

use crate::diagnostic::ConfigError;
use crate::model::FaenaConfig;

/// Validate a loaded configuration, collecting all violations.
pub fn validate_config(config: &FaenaConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.shop.days_ahead == 0 {
        errors.push(ConfigError::Validation {
            message: "shop.days_ahead must be at least 1".to_string(),
        });
    }

    if config.session.warning_secs >= config.session.timeout_secs {
        errors.push(ConfigError::Validation {
            message: format!(
                "session.warning_secs ({}) must be less than session.timeout_secs ({})",
                config.session.warning_secs, config.session.timeout_secs
            ),
        });
    }

    if config.session.ttl_secs < config.session.timeout_secs {
        errors.push(ConfigError::Validation {
            message: format!(
                "session.ttl_secs ({}) must be at least session.timeout_secs ({})",
                config.session.ttl_secs, config.session.timeout_secs
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.gateway.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    }

    if config.gateway.public_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.public_url must not be empty".to_string(),
        });
    }

    if config.whatsapp.api_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "whatsapp.api_url must not be empty".to_string(),
        });
    }

    errors
}
