// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types are the canonical domain types from `faena-core`; this module
//! re-exports them so query code reads uniformly.

pub use faena_core::types::{
    BotSettings, ClosedLine, Customer, DeliveryMode, DocumentKind, Gender, Order, OrderClosing,
    OrderItem, OrderStatus, Product, ScheduleDay,
};
