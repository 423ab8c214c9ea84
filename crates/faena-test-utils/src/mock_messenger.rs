// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock messenger for deterministic testing.
//!
//! `MockMessenger` implements `Messenger` by capturing every outbound
//! message for later assertion instead of calling any provider.

use async_trait::async_trait;
use tokio::sync::Mutex;

use faena_core::types::{ButtonMessage, ListMessage};
use faena_core::{FaenaError, Messenger};

/// One captured outbound message, in send order.
#[derive(Debug, Clone, PartialEq)]
pub enum SentMessage {
    Text { to: String, body: String },
    Buttons { to: String, message: ButtonMessage },
    List { to: String, message: ListMessage },
    Image { to: String, link: String },
}

impl SentMessage {
    /// The text body, button body, or list body of this message.
    pub fn body(&self) -> &str {
        match self {
            SentMessage::Text { body, .. } => body,
            SentMessage::Buttons { message, .. } => &message.body,
            SentMessage::List { message, .. } => &message.body,
            SentMessage::Image { link, .. } => link,
        }
    }
}

/// A messenger that records everything sent through it.
pub struct MockMessenger {
    sent: Mutex<Vec<SentMessage>>,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    /// All messages sent so far, in order.
    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }

    /// The body of the most recent message, if any.
    pub async fn last_body(&self) -> Option<String> {
        self.sent
            .lock()
            .await
            .last()
            .map(|m| m.body().to_string())
    }

    /// Whether any captured message body contains `needle`.
    pub async fn any_body_contains(&self, needle: &str) -> bool {
        self.sent
            .lock()
            .await
            .iter()
            .any(|m| m.body().contains(needle))
    }
}

impl Default for MockMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), FaenaError> {
        self.sent.lock().await.push(SentMessage::Text {
            to: to.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }

    async fn send_buttons(&self, to: &str, message: ButtonMessage) -> Result<(), FaenaError> {
        self.sent.lock().await.push(SentMessage::Buttons {
            to: to.to_string(),
            message,
        });
        Ok(())
    }

    async fn send_list(&self, to: &str, message: ListMessage) -> Result<(), FaenaError> {
        self.sent.lock().await.push(SentMessage::List {
            to: to.to_string(),
            message,
        });
        Ok(())
    }

    async fn send_image(&self, to: &str, link: &str) -> Result<(), FaenaError> {
        self.sent.lock().await.push(SentMessage::Image {
            to: to.to_string(),
            link: link.to_string(),
        });
        Ok(())
    }
}
