// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence trait for customers, products, orders, and the weekly
//! schedule. The engine only reads and requests mutations through this
//! surface; it never caches rows beyond one request.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::FaenaError;
use crate::types::{BotSettings, Customer, Order, OrderClosing, Product, ScheduleDay};

/// Adapter for the durable store backing the ordering flow.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Customers ---

    async fn customer_by_phone(&self, phone: &str) -> Result<Option<Customer>, FaenaError>;

    async fn create_customer(&self, customer: &Customer) -> Result<(), FaenaError>;

    /// Remembers the pickup-person name used on the customer's latest order.
    async fn set_last_pickup_person(&self, phone: &str, name: &str) -> Result<(), FaenaError>;

    // --- Products ---

    async fn product_by_id(&self, id: &str) -> Result<Option<Product>, FaenaError>;

    async fn active_products(&self) -> Result<Vec<Product>, FaenaError>;

    /// Atomically decrements stock by `quantity` only when the product is
    /// active and has at least that much stock. Returns whether the
    /// decrement was applied.
    async fn decrement_stock(&self, product_id: &str, quantity: u32) -> Result<bool, FaenaError>;

    /// Inserts or replaces a catalog entry (seeding/admin use).
    async fn upsert_product(&self, product: &Product) -> Result<(), FaenaError>;

    // --- Orders ---

    /// Inserts a new order. For turn orders the storage layer enforces the
    /// one-order-per-(date, time) invariant; a violation surfaces as
    /// [`FaenaError::SlotTaken`].
    async fn create_order(&self, order: &Order) -> Result<(), FaenaError>;

    async fn order_by_id(&self, id: &str) -> Result<Option<Order>, FaenaError>;

    /// HH:MM slots already consumed by turn orders on the given date.
    async fn booked_turn_times(&self, date: NaiveDate) -> Result<Vec<String>, FaenaError>;

    /// Records the closing (real kilograms, total) and flips the order to
    /// delivered.
    async fn close_order(&self, id: &str, closing: &OrderClosing) -> Result<(), FaenaError>;

    // --- Weekly schedule ---

    /// Template for one weekday (1=Monday .. 6=Saturday), if configured.
    async fn schedule_for_weekday(&self, weekday: u8) -> Result<Option<ScheduleDay>, FaenaError>;

    /// Weekday numbers that have a schedule template.
    async fn weekdays_with_schedule(&self) -> Result<Vec<u8>, FaenaError>;

    /// Inserts or replaces a weekday template (seeding/admin use).
    async fn upsert_schedule_day(&self, day: &ScheduleDay) -> Result<(), FaenaError>;

    // --- Bot switch ---

    /// The singleton bot settings; defaults to enabled when unset.
    async fn bot_settings(&self) -> Result<BotSettings, FaenaError>;

    async fn set_bot_settings(&self, settings: &BotSettings) -> Result<(), FaenaError>;
}
