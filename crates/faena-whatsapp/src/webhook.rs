// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound webhook payload parsing.
//!
//! The provider posts the full Cloud API envelope; only customer
//! messages matter here. Status callbacks (sent/delivered/read) and
//! message types the bot cannot act on are dropped.

use serde::Deserialize;
use tracing::debug;

use faena_core::types::{EventKind, InboundEvent};

#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Deserialize)]
pub struct Change {
    pub value: ChangeValue,
}

#[derive(Debug, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Vec<WebhookMessage>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookMessage {
    pub from: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<TextContent>,
    pub interactive: Option<InteractiveContent>,
}

#[derive(Debug, Deserialize)]
pub struct TextContent {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct InteractiveContent {
    pub button_reply: Option<SelectionReply>,
    pub list_reply: Option<SelectionReply>,
}

#[derive(Debug, Deserialize)]
pub struct SelectionReply {
    pub id: String,
}

/// Extract the first actionable customer message from one webhook
/// delivery, or `None` for status-only payloads.
pub fn extract_event(payload: &WebhookPayload) -> Option<InboundEvent> {
    let message = payload
        .entry
        .iter()
        .flat_map(|e| e.changes.iter())
        .flat_map(|c| c.value.messages.iter())
        .next()?;

    let kind = match message.kind.as_str() {
        "text" => EventKind::Text(message.text.as_ref()?.body.clone()),
        "interactive" => {
            let interactive = message.interactive.as_ref()?;
            let reply = interactive
                .button_reply
                .as_ref()
                .or(interactive.list_reply.as_ref())?;
            EventKind::Selection(reply.id.clone())
        }
        other => {
            debug!(from = %message.from, kind = %other, "ignoring unsupported message type");
            return None;
        }
    };

    Some(InboundEvent {
        from: message.from.clone(),
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<InboundEvent> {
        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        extract_event(&payload)
    }

    #[test]
    fn text_message_becomes_a_text_event() {
        let event = parse(
            r#"{
                "entry": [{"changes": [{"value": {"messages": [
                    {"from": "5491100000001", "type": "text", "text": {"body": "hola"}}
                ]}}]}]
            }"#,
        )
        .unwrap();
        assert_eq!(event.from, "5491100000001");
        assert_eq!(event.kind, EventKind::Text("hola".to_string()));
    }

    #[test]
    fn button_reply_becomes_a_selection() {
        let event = parse(
            r#"{
                "entry": [{"changes": [{"value": {"messages": [
                    {"from": "5491100000001", "type": "interactive",
                     "interactive": {"type": "button_reply",
                                     "button_reply": {"id": "MENU_PEDIR", "title": "🥩 Hacer pedido"}}}
                ]}}]}]
            }"#,
        )
        .unwrap();
        assert_eq!(event.kind, EventKind::Selection("MENU_PEDIR".to_string()));
    }

    #[test]
    fn list_reply_becomes_a_selection() {
        let event = parse(
            r#"{
                "entry": [{"changes": [{"value": {"messages": [
                    {"from": "5491100000001", "type": "interactive",
                     "interactive": {"type": "list_reply",
                                     "list_reply": {"id": "PROD_media-res", "title": "Media res"}}}
                ]}}]}]
            }"#,
        )
        .unwrap();
        assert_eq!(
            event.kind,
            EventKind::Selection("PROD_media-res".to_string())
        );
    }

    #[test]
    fn status_only_payloads_are_dropped() {
        assert!(
            parse(r#"{"entry": [{"changes": [{"value": {"statuses": [{"status": "read"}]}}]}]}"#)
                .is_none()
        );
        assert!(parse(r#"{"entry": []}"#).is_none());
    }

    #[test]
    fn unsupported_message_types_are_dropped() {
        assert!(
            parse(
                r#"{
                    "entry": [{"changes": [{"value": {"messages": [
                        {"from": "5491100000001", "type": "audio"}
                    ]}}]}]
                }"#,
            )
            .is_none()
        );
    }
}
