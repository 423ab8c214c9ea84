// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order operations. Slot exclusivity for turn orders is enforced here by
//! the partial unique index on (scheduled_date, scheduled_time); a
//! constraint violation on insert surfaces as [`FaenaError::SlotTaken`].

use chrono::NaiveDate;
use faena_core::FaenaError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{DeliveryMode, Order, OrderClosing, OrderItem, OrderStatus};

const ORDER_COLUMNS: &str = "id, phone, customer_name, pickup_person, scheduled_date, \
                             scheduled_time, mode, items, status, closing, created_at";

fn json_err(idx: usize, e: serde_json::Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}

fn row_to_order(row: &rusqlite::Row<'_>) -> Result<Order, rusqlite::Error> {
    let mode: String = row.get(6)?;
    let mode = mode.parse::<DeliveryMode>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let items: String = row.get(7)?;
    let items: Vec<OrderItem> = serde_json::from_str(&items).map_err(|e| json_err(7, e))?;
    let status: String = row.get(8)?;
    let status = status.parse::<OrderStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let closing: Option<String> = row.get(9)?;
    let closing: Option<OrderClosing> = closing
        .map(|c| serde_json::from_str(&c).map_err(|e| json_err(9, e)))
        .transpose()?;
    Ok(Order {
        id: row.get(0)?,
        phone: row.get(1)?,
        customer_name: row.get(2)?,
        pickup_person: row.get(3)?,
        date: row.get(4)?,
        time: row.get(5)?,
        mode,
        items,
        status,
        closing,
        created_at: row.get(10)?,
    })
}

/// Insert a new order.
///
/// For turn orders, a unique-index violation on (date, time) means the
/// slot was reserved by a concurrent order and returns `SlotTaken`.
pub async fn create(db: &Database, order: &Order) -> Result<(), FaenaError> {
    let items = serde_json::to_string(&order.items).map_err(|e| FaenaError::Storage {
        source: Box::new(e),
    })?;
    let o = order.clone();
    let result = db
        .connection()
        .call(move |conn| {
            conn.execute(
                &format!(
                    "INSERT INTO orders ({ORDER_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, NULL, ?10)"
                ),
                params![
                    o.id,
                    o.phone,
                    o.customer_name,
                    o.pickup_person,
                    o.date,
                    o.time,
                    o.mode.to_string(),
                    items,
                    o.status.to_string(),
                    o.created_at,
                ],
            )?;
            Ok(())
        })
        .await;

    match result {
        Ok(()) => Ok(()),
        Err(tokio_rusqlite::Error::Error(rusqlite::Error::SqliteFailure(err, _)))
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                && order.mode == DeliveryMode::Turn =>
        {
            Err(FaenaError::SlotTaken {
                date: order.date,
                time: order.time.clone().unwrap_or_default(),
            })
        }
        Err(e) => Err(crate::database::map_tr_err(e)),
    }
}

/// Get an order by id.
pub async fn get_by_id(db: &Database, id: &str) -> Result<Option<Order>, FaenaError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], row_to_order);
            match result {
                Ok(order) => Ok(Some(order)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// HH:MM times already held by turn orders on the given date, ascending.
pub async fn booked_turn_times(db: &Database, date: NaiveDate) -> Result<Vec<String>, FaenaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT scheduled_time FROM orders
                 WHERE scheduled_date = ?1 AND mode = 'TURNO'
                 ORDER BY scheduled_time",
            )?;
            let rows = stmt.query_map(params![date], |row| row.get(0))?;
            let mut times = Vec::new();
            for row in rows {
                times.push(row?);
            }
            Ok(times)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Record the closing (weighed kilograms, subtotals, total) and mark the
/// order delivered.
pub async fn close(db: &Database, id: &str, closing: &OrderClosing) -> Result<(), FaenaError> {
    let closing_json = serde_json::to_string(closing).map_err(|e| FaenaError::Storage {
        source: Box::new(e),
    })?;
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE orders SET closing = ?1, status = 'ENTREGADO' WHERE id = ?2",
                params![closing_json, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClosedLine, Gender};
    use chrono::Utc;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_item() -> OrderItem {
        OrderItem {
            product_id: "media-res".to_string(),
            name: "Media res".to_string(),
            plural_name: Some("Medias reses".to_string()),
            gender: Gender::Feminine,
            quantity: 2,
            price_per_kg: 3500.0,
            requires_turn: true,
        }
    }

    fn make_turn_order(id: &str, date: &str, time: &str) -> Order {
        Order {
            id: id.to_string(),
            phone: "5491100000001".to_string(),
            customer_name: "Juan Pérez".to_string(),
            pickup_person: "Juan Pérez".to_string(),
            date: date.parse().unwrap(),
            time: Some(time.to_string()),
            mode: DeliveryMode::Turn,
            items: vec![make_item()],
            status: OrderStatus::Reserved,
            closing: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_and_get_order_roundtrips() {
        let (db, _dir) = setup_db().await;
        let order = make_turn_order("ord-1", "2026-09-07", "09:00");

        create(&db, &order).await.unwrap();
        let retrieved = get_by_id(&db, "ord-1").await.unwrap().unwrap();
        assert_eq!(retrieved.phone, "5491100000001");
        assert_eq!(retrieved.time.as_deref(), Some("09:00"));
        assert_eq!(retrieved.mode, DeliveryMode::Turn);
        assert_eq!(retrieved.status, OrderStatus::Reserved);
        assert_eq!(retrieved.items.len(), 1);
        assert_eq!(retrieved.items[0].quantity, 2);
        assert!(retrieved.closing.is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn second_turn_order_on_same_slot_is_rejected() {
        let (db, _dir) = setup_db().await;
        create(&db, &make_turn_order("ord-1", "2026-09-07", "09:00"))
            .await
            .unwrap();

        let err = create(&db, &make_turn_order("ord-2", "2026-09-07", "09:00"))
            .await
            .unwrap_err();
        assert!(err.is_slot_taken());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_order_id_is_not_mistaken_for_a_slot_collision() {
        let (db, _dir) = setup_db().await;
        create(&db, &make_turn_order("ord-1", "2026-09-07", "09:00"))
            .await
            .unwrap();

        // Same primary key, free slot: a storage error, not SlotTaken.
        let err = create(&db, &make_turn_order("ord-1", "2026-09-07", "10:00"))
            .await
            .unwrap_err();
        assert!(!err.is_slot_taken());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn same_time_on_different_dates_is_fine() {
        let (db, _dir) = setup_db().await;
        create(&db, &make_turn_order("ord-1", "2026-09-07", "09:00"))
            .await
            .unwrap();
        create(&db, &make_turn_order("ord-2", "2026-09-08", "09:00"))
            .await
            .unwrap();
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn direct_orders_do_not_contend_for_slots() {
        let (db, _dir) = setup_db().await;
        let mut o1 = make_turn_order("ord-1", "2026-09-07", "09:00");
        o1.mode = DeliveryMode::Direct;
        o1.time = None;
        let mut o2 = make_turn_order("ord-2", "2026-09-07", "09:00");
        o2.mode = DeliveryMode::Direct;
        o2.time = None;

        create(&db, &o1).await.unwrap();
        create(&db, &o2).await.unwrap();

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn booked_turn_times_lists_taken_slots_in_order() {
        let (db, _dir) = setup_db().await;
        create(&db, &make_turn_order("ord-1", "2026-09-07", "11:00"))
            .await
            .unwrap();
        create(&db, &make_turn_order("ord-2", "2026-09-07", "09:00"))
            .await
            .unwrap();
        create(&db, &make_turn_order("ord-3", "2026-09-08", "09:00"))
            .await
            .unwrap();

        let times = booked_turn_times(&db, "2026-09-07".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(times, vec!["09:00", "11:00"]);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn close_order_records_closing_and_delivers() {
        let (db, _dir) = setup_db().await;
        create(&db, &make_turn_order("ord-1", "2026-09-07", "09:00"))
            .await
            .unwrap();

        let closing = OrderClosing {
            lines: vec![ClosedLine {
                product_id: "media-res".to_string(),
                name: "Media res".to_string(),
                kilos: 92.5,
                price_per_kg: 3500.0,
                subtotal: 323_750.0,
            }],
            total: 323_750.0,
            delivered_at: Utc::now(),
        };
        close(&db, "ord-1", &closing).await.unwrap();

        let retrieved = get_by_id(&db, "ord-1").await.unwrap().unwrap();
        assert_eq!(retrieved.status, OrderStatus::Delivered);
        let stored = retrieved.closing.unwrap();
        assert_eq!(stored.lines.len(), 1);
        assert!((stored.total - 323_750.0).abs() < f64::EPSILON);

        db.close().await.unwrap();
    }
}
