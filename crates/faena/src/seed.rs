// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `faena seed`: write the starter catalog, weekly schedule, and bot
//! settings. Idempotent; existing rows with the same ids are replaced.

use chrono::Utc;
use tracing::info;

use faena_config::FaenaConfig;
use faena_core::types::{BotSettings, Gender, Product, ScheduleDay};
use faena_core::{FaenaError, Repository};
use faena_storage::SqliteStore;

fn starter_products() -> Vec<Product> {
    let now = Utc::now();
    vec![
        Product {
            id: "media-res".to_string(),
            name: "Media res".to_string(),
            plural_name: Some("Medias reses".to_string()),
            gender: Gender::Feminine,
            description: "Media res entera, desposte a elección".to_string(),
            price_per_kg: 3900.0,
            stock: 10,
            requires_turn: true,
            active: true,
            created_at: now,
        },
        Product {
            id: "cuarto-trasero".to_string(),
            name: "Cuarto trasero".to_string(),
            plural_name: Some("Cuartos traseros".to_string()),
            gender: Gender::Masculine,
            description: "Cuarto trasero despostado".to_string(),
            price_per_kg: 4300.0,
            stock: 14,
            requires_turn: true,
            active: true,
            created_at: now,
        },
        Product {
            id: "costillar".to_string(),
            name: "Costillar".to_string(),
            plural_name: Some("Costillares".to_string()),
            gender: Gender::Masculine,
            description: "Costillar listo para retirar".to_string(),
            price_per_kg: 4600.0,
            stock: 20,
            requires_turn: false,
            active: true,
            created_at: now,
        },
        Product {
            id: "lechon".to_string(),
            name: "Lechón".to_string(),
            plural_name: Some("Lechones".to_string()),
            gender: Gender::Masculine,
            description: "Lechón entero".to_string(),
            price_per_kg: 5200.0,
            stock: 6,
            requires_turn: false,
            active: true,
            created_at: now,
        },
    ]
}

/// Monday through Saturday, one turn slot per hour in the morning.
fn starter_schedule() -> Vec<ScheduleDay> {
    const DAY_NAMES: [&str; 6] = [
        "Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado",
    ];
    DAY_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| ScheduleDay {
            weekday: (i + 1) as u8,
            name: (*name).to_string(),
            slots: vec![
                "08:00".to_string(),
                "09:00".to_string(),
                "10:00".to_string(),
                "11:00".to_string(),
            ],
        })
        .collect()
}

pub async fn run(config: FaenaConfig) -> Result<(), FaenaError> {
    let store = SqliteStore::open(&config.storage).await?;

    let products = starter_products();
    for product in &products {
        store.upsert_product(product).await?;
    }

    let schedule = starter_schedule();
    for day in &schedule {
        store.upsert_schedule_day(day).await?;
    }

    store.set_bot_settings(&BotSettings::default()).await?;

    info!(
        products = products.len(),
        days = schedule.len(),
        path = %config.storage.database_path,
        "seed complete"
    );

    store.close().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use faena_config::StorageConfig;
    use tempfile::tempdir;

    #[tokio::test]
    async fn seed_is_idempotent_and_queryable() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("seed.db");
        let mut config = faena_config::load_and_validate_str("").unwrap();
        config.storage = StorageConfig {
            database_path: db_path.to_str().unwrap().to_string(),
        };

        run(config.clone()).await.unwrap();
        run(config.clone()).await.unwrap();

        let store = SqliteStore::open(&config.storage).await.unwrap();
        let products = store.active_products().await.unwrap();
        assert_eq!(products.len(), 4);
        assert!(products.iter().any(|p| p.id == "media-res" && p.requires_turn));

        let weekdays = store.weekdays_with_schedule().await.unwrap();
        assert_eq!(weekdays, vec![1, 2, 3, 4, 5, 6]);

        let settings = store.bot_settings().await.unwrap();
        assert!(settings.enabled);
        store.close().await.unwrap();
    }
}
