// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Faena ordering bot.
//!
//! This crate provides the error type, domain model, message shapes, and
//! the adapter traits ([`Repository`], [`Messenger`]) implemented by the
//! storage and transport crates.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::FaenaError;
pub use traits::{Messenger, Repository};
pub use types::{
    BotSettings, Button, ButtonMessage, ClosedLine, Customer, DeliveryMode, DocumentKind,
    EventKind, Gender, InboundEvent, ListMessage, ListRow, Order, OrderClosing, OrderItem,
    OrderStatus, Product, ScheduleDay,
};
