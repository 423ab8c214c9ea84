// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The ephemeral conversation session and its step enum.
//!
//! `Step` is a closed enumeration carrying step-specific payload so that
//! illegal states are unrepresentable: a chosen time only exists inside
//! `Schedule::Turn`, which cannot exist without its date.

use chrono::{DateTime, NaiveDate, Utc};

use faena_core::types::{Customer, DeliveryMode, OrderItem};

/// The scheduling outcome of date/time selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    /// A reserved turn slot.
    Turn { date: NaiveDate, time: String },
    /// Same-day pickup within the business-hours window.
    Direct { date: NaiveDate },
}

impl Schedule {
    pub fn date(&self) -> NaiveDate {
        match self {
            Schedule::Turn { date, .. } | Schedule::Direct { date } => *date,
        }
    }

    pub fn time(&self) -> Option<&str> {
        match self {
            Schedule::Turn { time, .. } => Some(time),
            Schedule::Direct { .. } => None,
        }
    }

    pub fn mode(&self) -> DeliveryMode {
        match self {
            Schedule::Turn { .. } => DeliveryMode::Turn,
            Schedule::Direct { .. } => DeliveryMode::Direct,
        }
    }
}

/// The product whose quantity is currently being collected.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingProduct {
    pub product_id: String,
    pub name: String,
    pub price_per_kg: f64,
    pub requires_turn: bool,
}

/// Where the conversation currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// First contact: waiting for the full name or company name.
    AwaitingName,
    /// Name captured, waiting for DNI/CUIT.
    AwaitingDocument { raw_name: String },
    Menu,
    Products,
    CollectingQuantity { pending: PendingProduct },
    /// Read-only browse of dates with open slots.
    ViewingSchedule,
    /// Turn-vs-direct choice for carts with at least one turn item.
    ModalitySelection,
    DateSelection { mode: DeliveryMode },
    TimeSelection { date: NaiveDate },
    /// The customer has a remembered pickup person to reuse or replace.
    PickupChoice { schedule: Schedule },
    PickupPersonPrompt { schedule: Schedule },
    Confirming { schedule: Schedule, pickup_person: String },
    /// Terminal: said goodbye. Next message starts over at the menu.
    Exited,
    /// Terminal: order placed. Next message starts over at the menu.
    Finalized,
}

/// Per-customer conversation state, keyed by phone.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub phone: String,
    pub customer: Option<Customer>,
    /// Ordered cart lines; same-product additions merge into one line.
    pub cart: Vec<OrderItem>,
    pub step: Step,
    pub last_activity: DateTime<Utc>,
    /// Whether the inactivity warning already fired.
    pub warned: bool,
}

impl Session {
    pub fn new(phone: &str, customer: Option<Customer>, step: Step) -> Self {
        Self {
            phone: phone.to_string(),
            customer,
            cart: Vec::new(),
            step,
            last_activity: Utc::now(),
            warned: false,
        }
    }

    /// Refresh the activity timestamp and clear the warning flag.
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
        self.warned = false;
    }

    /// Merge a quantity into an existing cart line for the same product,
    /// or append a new line. Returns the resulting line quantity.
    pub fn add_to_cart(&mut self, item: OrderItem) -> u32 {
        if let Some(line) = self
            .cart
            .iter_mut()
            .find(|l| l.product_id == item.product_id)
        {
            line.quantity += item.quantity;
            line.quantity
        } else {
            let quantity = item.quantity;
            self.cart.push(item);
            quantity
        }
    }
}
