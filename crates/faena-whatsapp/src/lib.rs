// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp Business API transport for the Faena ordering bot.
//!
//! Implements [`Messenger`] against the Cloud API messages endpoint as
//! exposed by 360dialog, and parses inbound webhook deliveries into
//! [`faena_core::types::InboundEvent`]s.

pub mod payload;
pub mod webhook;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::debug;

use faena_config::WhatsAppConfig;
use faena_core::types::{ButtonMessage, ListMessage};
use faena_core::{FaenaError, Messenger};

use crate::payload::{ImagePayload, InteractivePayload, TextPayload};

/// Messenger backed by the WhatsApp Business messages endpoint.
///
/// The API key travels as the `D360-API-KEY` default header on a pooled
/// client.
pub struct WhatsAppMessenger {
    client: reqwest::Client,
    messages_url: String,
}

impl WhatsAppMessenger {
    pub fn new(config: &WhatsAppConfig) -> Result<Self, FaenaError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                FaenaError::Config("whatsapp.api_key is required to send messages".into())
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "D360-API-KEY",
            HeaderValue::from_str(api_key)
                .map_err(|e| FaenaError::Config(format!("invalid whatsapp.api_key: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FaenaError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            messages_url: format!("{}/messages", config.api_url.trim_end_matches('/')),
        })
    }

    async fn post<T: Serialize>(&self, payload: &T) -> Result<(), FaenaError> {
        let response = self
            .client
            .post(&self.messages_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| FaenaError::Channel {
                message: format!("WhatsApp request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(status = %status, "WhatsApp message accepted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(FaenaError::Channel {
            message: format!("WhatsApp API returned {status}: {body}"),
            source: None,
        })
    }
}

#[async_trait]
impl Messenger for WhatsAppMessenger {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), FaenaError> {
        self.post(&TextPayload::new(to, body)).await
    }

    async fn send_buttons(&self, to: &str, message: ButtonMessage) -> Result<(), FaenaError> {
        self.post(&InteractivePayload::buttons(to, message)).await
    }

    async fn send_list(&self, to: &str, message: ListMessage) -> Result<(), FaenaError> {
        self.post(&InteractivePayload::list(to, message)).await
    }

    async fn send_image(&self, to: &str, link: &str) -> Result<(), FaenaError> {
        self.post(&ImagePayload::new(to, link)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faena_core::types::Button;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server_uri: &str) -> WhatsAppConfig {
        WhatsAppConfig {
            api_url: server_uri.to_string(),
            api_key: Some("test-key".to_string()),
            verify_token: Some("verify-me".to_string()),
        }
    }

    #[tokio::test]
    async fn send_text_posts_the_cloud_api_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header("D360-API-KEY", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "messaging_product": "whatsapp",
                "to": "5491100000001",
                "type": "text",
                "text": {"body": "hola"}
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let messenger = WhatsAppMessenger::new(&config(&server.uri())).unwrap();
        messenger.send_text("5491100000001", "hola").await.unwrap();
    }

    #[tokio::test]
    async fn send_buttons_posts_an_interactive_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(body_partial_json(serde_json::json!({
                "type": "interactive",
                "interactive": {
                    "type": "button",
                    "action": {"buttons": [
                        {"type": "reply", "reply": {"id": "MENU_PEDIR", "title": "🥩 Hacer pedido"}}
                    ]}
                }
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let messenger = WhatsAppMessenger::new(&config(&server.uri())).unwrap();
        messenger
            .send_buttons(
                "5491100000001",
                ButtonMessage {
                    body: "👋 Bienvenido".to_string(),
                    buttons: vec![Button {
                        id: "MENU_PEDIR".to_string(),
                        title: "🥩 Hacer pedido".to_string(),
                    }],
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn non_success_status_surfaces_as_channel_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad api key"))
            .mount(&server)
            .await;

        let messenger = WhatsAppMessenger::new(&config(&server.uri())).unwrap();
        let err = messenger.send_text("5491100000001", "hola").await.unwrap_err();
        match err {
            FaenaError::Channel { message, .. } => {
                assert!(message.contains("401"));
                assert!(message.contains("bad api key"));
            }
            other => panic!("expected channel error, got {other:?}"),
        }
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let bad = WhatsAppConfig {
            api_url: "https://waba.example".to_string(),
            api_key: None,
            verify_token: None,
        };
        assert!(matches!(
            WhatsAppMessenger::new(&bad),
            Err(FaenaError::Config(_))
        ));
    }
}
