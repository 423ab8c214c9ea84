// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product catalog operations, including the atomic stock decrement.

use faena_core::FaenaError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{Gender, Product};

const PRODUCT_COLUMNS: &str = "id, name, plural_name, gender, description, price_per_kg, \
                               stock, requires_turn, active, created_at";

fn row_to_product(row: &rusqlite::Row<'_>) -> Result<Product, rusqlite::Error> {
    let gender: String = row.get(3)?;
    let gender = gender.parse::<Gender>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        plural_name: row.get(2)?,
        gender,
        description: row.get(4)?,
        price_per_kg: row.get(5)?,
        stock: row.get(6)?,
        requires_turn: row.get(7)?,
        active: row.get(8)?,
        created_at: row.get(9)?,
    })
}

/// Get a product by id.
pub async fn get_by_id(db: &Database, id: &str) -> Result<Option<Product>, FaenaError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_product);
            match result {
                Ok(product) => Ok(Some(product)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All active catalog entries, in name order. Includes out-of-stock
/// products so they can be shown as unavailable.
pub async fn active_products(db: &Database) -> Result<Vec<Product>, FaenaError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products WHERE active = 1 ORDER BY name"
            ))?;
            let rows = stmt.query_map([], row_to_product)?;
            let mut products = Vec::new();
            for row in rows {
                products.push(row?);
            }
            Ok(products)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Atomically decrement stock, guarded against races: the decrement only
/// applies when the product is still active and holds enough stock.
/// Returns whether a row was changed.
pub async fn decrement_stock(
    db: &Database,
    product_id: &str,
    quantity: u32,
) -> Result<bool, FaenaError> {
    let product_id = product_id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE products SET stock = stock - ?1
                 WHERE id = ?2 AND active = 1 AND stock >= ?1",
                params![quantity, product_id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert or replace a catalog entry (seeding and admin edits).
pub async fn upsert(db: &Database, product: &Product) -> Result<(), FaenaError> {
    let product = product.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                &format!(
                    "INSERT OR REPLACE INTO products ({PRODUCT_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
                ),
                params![
                    product.id,
                    product.name,
                    product.plural_name,
                    product.gender.to_string(),
                    product.description,
                    product.price_per_kg,
                    product.stock,
                    product.requires_turn,
                    product.active,
                    product.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
