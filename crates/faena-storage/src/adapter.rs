// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`Repository`] trait.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use faena_config::StorageConfig;
use faena_core::types::{BotSettings, Customer, Order, OrderClosing, Product, ScheduleDay};
use faena_core::{FaenaError, Repository};

use crate::database::Database;
use crate::queries;

/// SQLite-backed repository.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open the database at the configured path, running migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, FaenaError> {
        let db = Database::open(&config.database_path).await?;
        debug!(path = %config.database_path, "SQLite store ready");
        Ok(Self { db })
    }

    /// Checkpoint the WAL before shutdown.
    pub async fn close(&self) -> Result<(), FaenaError> {
        self.db.close().await
    }
}

#[async_trait]
impl Repository for SqliteStore {
    async fn customer_by_phone(&self, phone: &str) -> Result<Option<Customer>, FaenaError> {
        queries::customers::get_by_phone(&self.db, phone).await
    }

    async fn create_customer(&self, customer: &Customer) -> Result<(), FaenaError> {
        queries::customers::create(&self.db, customer).await
    }

    async fn set_last_pickup_person(&self, phone: &str, name: &str) -> Result<(), FaenaError> {
        queries::customers::set_last_pickup_person(&self.db, phone, name).await
    }

    async fn product_by_id(&self, id: &str) -> Result<Option<Product>, FaenaError> {
        queries::products::get_by_id(&self.db, id).await
    }

    async fn active_products(&self) -> Result<Vec<Product>, FaenaError> {
        queries::products::active_products(&self.db).await
    }

    async fn decrement_stock(&self, product_id: &str, quantity: u32) -> Result<bool, FaenaError> {
        queries::products::decrement_stock(&self.db, product_id, quantity).await
    }

    async fn upsert_product(&self, product: &Product) -> Result<(), FaenaError> {
        queries::products::upsert(&self.db, product).await
    }

    async fn create_order(&self, order: &Order) -> Result<(), FaenaError> {
        queries::orders::create(&self.db, order).await
    }

    async fn order_by_id(&self, id: &str) -> Result<Option<Order>, FaenaError> {
        queries::orders::get_by_id(&self.db, id).await
    }

    async fn booked_turn_times(&self, date: NaiveDate) -> Result<Vec<String>, FaenaError> {
        queries::orders::booked_turn_times(&self.db, date).await
    }

    async fn close_order(&self, id: &str, closing: &OrderClosing) -> Result<(), FaenaError> {
        queries::orders::close(&self.db, id, closing).await
    }

    async fn schedule_for_weekday(&self, weekday: u8) -> Result<Option<ScheduleDay>, FaenaError> {
        queries::schedule::for_weekday(&self.db, weekday).await
    }

    async fn weekdays_with_schedule(&self) -> Result<Vec<u8>, FaenaError> {
        queries::schedule::weekdays(&self.db).await
    }

    async fn upsert_schedule_day(&self, day: &ScheduleDay) -> Result<(), FaenaError> {
        queries::schedule::upsert(&self.db, day).await
    }

    async fn bot_settings(&self) -> Result<BotSettings, FaenaError> {
        queries::settings::get(&self.db).await
    }

    async fn set_bot_settings(&self, settings: &BotSettings) -> Result<(), FaenaError> {
        queries::settings::set(&self.db, settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use faena_core::types::{DeliveryMode, DocumentKind, Gender, OrderItem, OrderStatus};
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
        }
    }

    async fn open_store(dir: &tempfile::TempDir, name: &str) -> SqliteStore {
        let db_path = dir.path().join(name);
        SqliteStore::open(&make_config(db_path.to_str().unwrap()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn open_creates_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("adapter.db");
        let store = SqliteStore::open(&make_config(db_path.to_str().unwrap()))
            .await
            .unwrap();
        assert!(db_path.exists());
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn full_order_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir, "lifecycle.db").await;

        let customer = Customer {
            phone: "5491100000001".to_string(),
            name: "Juan Pérez".to_string(),
            document: "30123456".to_string(),
            document_kind: DocumentKind::Dni,
            last_pickup_person: None,
            created_at: Utc::now(),
        };
        store.create_customer(&customer).await.unwrap();

        let product = Product {
            id: "media-res".to_string(),
            name: "Media res".to_string(),
            plural_name: Some("Medias reses".to_string()),
            gender: Gender::Feminine,
            description: String::new(),
            price_per_kg: 3500.0,
            stock: 4,
            requires_turn: true,
            active: true,
            created_at: Utc::now(),
        };
        store.upsert_product(&product).await.unwrap();

        // Reserve stock, then the slot.
        assert!(store.decrement_stock("media-res", 2).await.unwrap());
        let order = Order {
            id: "ord-1".to_string(),
            phone: customer.phone.clone(),
            customer_name: customer.name.clone(),
            pickup_person: customer.name.clone(),
            date: "2026-09-07".parse().unwrap(),
            time: Some("09:00".to_string()),
            mode: DeliveryMode::Turn,
            items: vec![OrderItem {
                product_id: product.id.clone(),
                name: product.name.clone(),
                plural_name: product.plural_name.clone(),
                gender: product.gender,
                quantity: 2,
                price_per_kg: product.price_per_kg,
                requires_turn: true,
            }],
            status: OrderStatus::Reserved,
            closing: None,
            created_at: Utc::now(),
        };
        store.create_order(&order).await.unwrap();

        store
            .set_last_pickup_person(&customer.phone, &customer.name)
            .await
            .unwrap();

        let stored = store.order_by_id("ord-1").await.unwrap().unwrap();
        assert_eq!(stored.items[0].product_id, "media-res");

        let times = store
            .booked_turn_times("2026-09-07".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(times, vec!["09:00"]);

        let remaining = store.product_by_id("media-res").await.unwrap().unwrap();
        assert_eq!(remaining.stock, 2);

        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn slot_contention_surfaces_as_slot_taken() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir, "contention.db").await;

        let mut order = Order {
            id: "ord-a".to_string(),
            phone: "5491100000001".to_string(),
            customer_name: "Juan Pérez".to_string(),
            pickup_person: "Juan Pérez".to_string(),
            date: "2026-09-07".parse().unwrap(),
            time: Some("10:00".to_string()),
            mode: DeliveryMode::Turn,
            items: vec![],
            status: OrderStatus::Reserved,
            closing: None,
            created_at: Utc::now(),
        };
        store.create_order(&order).await.unwrap();

        order.id = "ord-b".to_string();
        let err = store.create_order(&order).await.unwrap_err();
        assert!(err.is_slot_taken());

        store.close().await.unwrap();
    }
}
