// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound messaging trait for the WhatsApp transport.

use async_trait::async_trait;

use crate::error::FaenaError;
use crate::types::{ButtonMessage, ListMessage};

/// Adapter for delivering messages to the customer's phone.
///
/// The engine treats these as fire-and-forget sends: success means the
/// provider accepted the message, not that it was delivered.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends a plain text message.
    async fn send_text(&self, to: &str, body: &str) -> Result<(), FaenaError>;

    /// Sends a 2-3 option button-choice message.
    async fn send_buttons(&self, to: &str, msg: ButtonMessage) -> Result<(), FaenaError>;

    /// Sends a list-choice message with a single section of rows.
    async fn send_list(&self, to: &str, msg: ListMessage) -> Result<(), FaenaError>;

    /// Sends an image by public link (the pickup QR).
    async fn send_image(&self, to: &str, link: &str) -> Result<(), FaenaError>;
}
