// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Faena ordering bot.

use chrono::NaiveDate;
use thiserror::Error;

/// The primary error type used across all Faena adapter traits and core operations.
#[derive(Debug, Error)]
pub enum FaenaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging transport errors (send failure, malformed payload, HTTP status).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A turn-based order already holds the requested (date, time) slot.
    ///
    /// This is expected contention during finalize, not a system failure:
    /// the caller returns the customer to slot selection.
    #[error("slot already booked: {date} {time}")]
    SlotTaken { date: NaiveDate, time: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FaenaError {
    /// True when the error is the retryable slot-contention outcome.
    pub fn is_slot_taken(&self) -> bool {
        matches!(self, FaenaError::SlotTaken { .. })
    }
}
