// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound request payloads for the WhatsApp Business messages endpoint.
//!
//! The wire format is the Cloud API shape as relayed by 360dialog: every
//! payload carries `messaging_product: "whatsapp"` and a type-specific
//! object.

use serde::Serialize;

use faena_core::types::{ButtonMessage, ListMessage};

#[derive(Debug, Serialize)]
pub struct TextPayload<'a> {
    pub messaging_product: &'static str,
    pub to: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: TextBody<'a>,
}

#[derive(Debug, Serialize)]
pub struct TextBody<'a> {
    pub body: &'a str,
}

impl<'a> TextPayload<'a> {
    pub fn new(to: &'a str, body: &'a str) -> Self {
        Self {
            messaging_product: "whatsapp",
            to,
            kind: "text",
            text: TextBody { body },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImagePayload<'a> {
    pub messaging_product: &'static str,
    pub to: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub image: ImageLink<'a>,
}

#[derive(Debug, Serialize)]
pub struct ImageLink<'a> {
    pub link: &'a str,
}

impl<'a> ImagePayload<'a> {
    pub fn new(to: &'a str, link: &'a str) -> Self {
        Self {
            messaging_product: "whatsapp",
            to,
            kind: "image",
            image: ImageLink { link },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InteractivePayload<'a> {
    pub messaging_product: &'static str,
    pub to: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub interactive: Interactive,
}

#[derive(Debug, Serialize)]
pub struct Interactive {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub body: InteractiveBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<InteractiveBody>,
    pub action: Action,
}

#[derive(Debug, Serialize)]
pub struct InteractiveBody {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Action {
    /// Reply buttons, three at most.
    Buttons { buttons: Vec<ReplyButton> },
    /// A single-section list.
    List {
        button: String,
        sections: Vec<Section>,
    },
}

#[derive(Debug, Serialize)]
pub struct ReplyButton {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub reply: Reply,
}

#[derive(Debug, Serialize)]
pub struct Reply {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct Section {
    pub title: String,
    pub rows: Vec<Row>,
}

#[derive(Debug, Serialize)]
pub struct Row {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl<'a> InteractivePayload<'a> {
    pub fn buttons(to: &'a str, message: ButtonMessage) -> Self {
        Self {
            messaging_product: "whatsapp",
            to,
            kind: "interactive",
            interactive: Interactive {
                kind: "button",
                body: InteractiveBody { text: message.body },
                footer: None,
                action: Action::Buttons {
                    buttons: message
                        .buttons
                        .into_iter()
                        .map(|b| ReplyButton {
                            kind: "reply",
                            reply: Reply {
                                id: b.id,
                                title: b.title,
                            },
                        })
                        .collect(),
                },
            },
        }
    }

    pub fn list(to: &'a str, message: ListMessage) -> Self {
        Self {
            messaging_product: "whatsapp",
            to,
            kind: "interactive",
            interactive: Interactive {
                kind: "list",
                body: InteractiveBody { text: message.body },
                footer: message.footer.map(|text| InteractiveBody { text }),
                action: Action::List {
                    button: message.button_text,
                    sections: vec![Section {
                        title: message.section_title,
                        rows: message
                            .rows
                            .into_iter()
                            .map(|r| Row {
                                id: r.id,
                                title: r.title,
                                description: r.description,
                            })
                            .collect(),
                    }],
                },
            },
        }
    }
}
