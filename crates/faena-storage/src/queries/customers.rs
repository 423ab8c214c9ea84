// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Customer CRUD operations.

use faena_core::FaenaError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{Customer, DocumentKind};

fn row_to_customer(row: &rusqlite::Row<'_>) -> Result<Customer, rusqlite::Error> {
    let kind: String = row.get(3)?;
    let document_kind = kind.parse::<DocumentKind>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Customer {
        phone: row.get(0)?,
        name: row.get(1)?,
        document: row.get(2)?,
        document_kind,
        last_pickup_person: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Get a customer by phone, the session key.
pub async fn get_by_phone(db: &Database, phone: &str) -> Result<Option<Customer>, FaenaError> {
    let phone = phone.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT phone, name, document, document_kind, last_pickup_person, created_at
                 FROM customers WHERE phone = ?1",
            )?;
            let result = stmt.query_row(params![phone], row_to_customer);
            match result {
                Ok(customer) => Ok(Some(customer)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Register a new customer after the identification step.
pub async fn create(db: &Database, customer: &Customer) -> Result<(), FaenaError> {
    let customer = customer.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO customers (phone, name, document, document_kind, last_pickup_person, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    customer.phone,
                    customer.name,
                    customer.document,
                    customer.document_kind.to_string(),
                    customer.last_pickup_person,
                    customer.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Remember the pickup-person name from the customer's latest order.
pub async fn set_last_pickup_person(
    db: &Database,
    phone: &str,
    name: &str,
) -> Result<(), FaenaError> {
    let phone = phone.to_string();
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE customers SET last_pickup_person = ?1 WHERE phone = ?2",
                params![name, phone],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_customer(phone: &str) -> Customer {
        Customer {
            phone: phone.to_string(),
            name: "Juan Pérez".to_string(),
            document: "30123456".to_string(),
            document_kind: DocumentKind::Dni,
            last_pickup_person: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_and_get_customer_roundtrips() {
        let (db, _dir) = setup_db().await;
        let customer = make_customer("5491100000001");

        create(&db, &customer).await.unwrap();
        let retrieved = get_by_phone(&db, "5491100000001").await.unwrap().unwrap();
        assert_eq!(retrieved.name, "Juan Pérez");
        assert_eq!(retrieved.document, "30123456");
        assert_eq!(retrieved.document_kind, DocumentKind::Dni);
        assert!(retrieved.last_pickup_person.is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_phone_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_by_phone(&db, "5491199999999").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn cuit_customer_persists_kind() {
        let (db, _dir) = setup_db().await;
        let mut customer = make_customer("5491100000002");
        customer.document = "30712345678".to_string();
        customer.document_kind = DocumentKind::Cuit;
        customer.name = "FRIGORÍFICO SUR".to_string();

        create(&db, &customer).await.unwrap();
        let retrieved = get_by_phone(&db, "5491100000002").await.unwrap().unwrap();
        assert_eq!(retrieved.document_kind, DocumentKind::Cuit);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn set_last_pickup_person_updates_in_place() {
        let (db, _dir) = setup_db().await;
        let customer = make_customer("5491100000003");
        create(&db, &customer).await.unwrap();

        set_last_pickup_person(&db, "5491100000003", "María López")
            .await
            .unwrap();

        let retrieved = get_by_phone(&db, "5491100000003").await.unwrap().unwrap();
        assert_eq!(retrieved.last_pickup_person.as_deref(), Some("María López"));

        db.close().await.unwrap();
    }
}
