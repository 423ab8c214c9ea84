// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across adapter traits and the conversation engine.
//!
//! These are the canonical definitions; the storage crate re-exports them
//! rather than declaring its own row structs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// --- Inbound events ---

/// One normalized inbound webhook event, addressed by sender phone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Sender phone identifier (session key).
    pub from: String,
    pub kind: EventKind,
}

/// What the customer sent: free text, or the id carried by a
/// button/list reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Text(String),
    Selection(String),
}

// --- Outbound message shapes ---

/// A reply button (2-3 per message).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub id: String,
    pub title: String,
}

/// A button-choice message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonMessage {
    pub body: String,
    pub buttons: Vec<Button>,
}

/// A single row of a list-choice message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRow {
    pub id: String,
    pub title: String,
    pub description: String,
}

/// A list-choice message with one section of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMessage {
    pub body: String,
    pub button_text: String,
    pub section_title: String,
    pub rows: Vec<ListRow>,
    pub footer: Option<String>,
}

// --- Customers ---

/// Document class captured during identification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
pub enum DocumentKind {
    /// National ID, 7-8 digits (a person).
    #[strum(serialize = "DNI")]
    #[serde(rename = "DNI")]
    Dni,
    /// Tax ID, 11 digits (a company).
    #[strum(serialize = "CUIT")]
    #[serde(rename = "CUIT")]
    Cuit,
}

/// A known customer, keyed by phone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub phone: String,
    pub name: String,
    pub document: String,
    pub document_kind: DocumentKind,
    /// Last pickup-person name used, offered as a fast path on the
    /// next order.
    pub last_pickup_person: Option<String>,
    pub created_at: DateTime<Utc>,
}

// --- Products ---

/// Grammatical gender of a product name; drives message phrasing
/// ("¿Cuántas?" vs "¿Cuántos?", "agregada" vs "agregado").
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
pub enum Gender {
    #[strum(serialize = "masculino")]
    #[serde(rename = "masculino")]
    Masculine,
    #[strum(serialize = "femenino")]
    #[serde(rename = "femenino")]
    Feminine,
}

/// A catalog entry. Stock is counted in integer units, not kilograms;
/// the price is per kilogram and the final amount is settled at pickup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub plural_name: Option<String>,
    pub gender: Gender,
    pub description: String,
    pub price_per_kg: f64,
    pub stock: i64,
    /// Whether fulfillment consumes a scheduled turn slot.
    pub requires_turn: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Display name for a given quantity (plural form when available).
    pub fn name_for_quantity(&self, quantity: u32) -> &str {
        if quantity == 1 {
            &self.name
        } else {
            self.plural_name.as_deref().unwrap_or(&self.name)
        }
    }
}

// --- Orders ---

/// Delivery mode: a scheduled turn or a direct same-day pickup window.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
pub enum DeliveryMode {
    #[strum(serialize = "TURNO")]
    #[serde(rename = "TURNO")]
    Turn,
    #[strum(serialize = "RETIRO_DIA")]
    #[serde(rename = "RETIRO_DIA")]
    Direct,
}

/// Order lifecycle state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
pub enum OrderStatus {
    #[strum(serialize = "RESERVADO")]
    #[serde(rename = "RESERVADO")]
    Reserved,
    #[strum(serialize = "CANCELADO")]
    #[serde(rename = "CANCELADO")]
    Cancelled,
    #[strum(serialize = "ENTREGADO")]
    #[serde(rename = "ENTREGADO")]
    Delivered,
}

/// One ordered line, snapshotting the product at reservation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub plural_name: Option<String>,
    pub gender: Gender,
    pub quantity: u32,
    pub price_per_kg: f64,
    pub requires_turn: bool,
}

impl OrderItem {
    pub fn name_for_quantity(&self, quantity: u32) -> &str {
        if quantity == 1 {
            &self.name
        } else {
            self.plural_name.as_deref().unwrap_or(&self.name)
        }
    }
}

/// A closed line recorded at delivery: real kilograms weighed at the
/// counter and the resulting subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedLine {
    pub product_id: String,
    pub name: String,
    pub kilos: f64,
    pub price_per_kg: f64,
    pub subtotal: f64,
}

/// The closing record attached when an order is delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderClosing {
    pub lines: Vec<ClosedLine>,
    pub total: f64,
    pub delivered_at: DateTime<Utc>,
}

/// A durable order. Immutable once reserved, except for the closing step.
///
/// `time` is `Some` if and only if `mode` is [`DeliveryMode::Turn`]; at
/// most one turn order may exist per (date, time), enforced by the storage
/// layer at insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub phone: String,
    pub customer_name: String,
    pub pickup_person: String,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub mode: DeliveryMode,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub closing: Option<OrderClosing>,
    pub created_at: DateTime<Utc>,
}

// --- Schedule & settings ---

/// The weekly schedule template for one weekday (1=Monday .. 6=Saturday).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub weekday: u8,
    pub name: String,
    /// Valid turn slots for the weekday, zero-padded "HH:MM", ascending.
    pub slots: Vec<String>,
}

/// Singleton bot switch: whether the bot takes orders, and the message
/// shown when it does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotSettings {
    pub enabled: bool,
    pub closed_message: String,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            closed_message:
                "🚫 Hoy no hay pedidos disponibles. Volvé a escribir más tarde.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn delivery_mode_round_trips_through_strings() {
        for mode in [DeliveryMode::Turn, DeliveryMode::Direct] {
            let s = mode.to_string();
            assert_eq!(DeliveryMode::from_str(&s).unwrap(), mode);
        }
        assert_eq!(DeliveryMode::Turn.to_string(), "TURNO");
        assert_eq!(DeliveryMode::Direct.to_string(), "RETIRO_DIA");
    }

    #[test]
    fn order_status_string_forms() {
        assert_eq!(OrderStatus::Reserved.to_string(), "RESERVADO");
        assert_eq!(OrderStatus::Delivered.to_string(), "ENTREGADO");
        assert_eq!(
            OrderStatus::from_str("CANCELADO").unwrap(),
            OrderStatus::Cancelled
        );
    }

    #[test]
    fn product_name_uses_plural_when_available() {
        let p = Product {
            id: "p1".into(),
            name: "Media res".into(),
            plural_name: Some("Medias reses".into()),
            gender: Gender::Feminine,
            description: String::new(),
            price_per_kg: 3500.0,
            stock: 5,
            requires_turn: true,
            active: true,
            created_at: Utc::now(),
        };
        assert_eq!(p.name_for_quantity(1), "Media res");
        assert_eq!(p.name_for_quantity(2), "Medias reses");
    }

    #[test]
    fn product_name_falls_back_to_singular() {
        let p = Product {
            id: "p2".into(),
            name: "Costillar".into(),
            plural_name: None,
            gender: Gender::Masculine,
            description: String::new(),
            price_per_kg: 4200.0,
            stock: 3,
            requires_turn: false,
            active: true,
            created_at: Utc::now(),
        };
        assert_eq!(p.name_for_quantity(4), "Costillar");
    }

    #[test]
    fn order_item_serializes_for_storage() {
        let item = OrderItem {
            product_id: "p1".into(),
            name: "Media res".into(),
            plural_name: Some("Medias reses".into()),
            gender: Gender::Feminine,
            quantity: 2,
            price_per_kg: 3500.0,
            requires_turn: true,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"gender\":\"femenino\""));
        let back: OrderItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn default_settings_keep_the_bot_open() {
        let s = BotSettings::default();
        assert!(s.enabled);
        assert!(s.closed_message.contains("pedidos"));
    }
}
