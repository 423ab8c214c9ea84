// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Singleton bot settings (enabled switch plus closed message).

use faena_core::FaenaError;
use rusqlite::params;

use crate::database::Database;
use crate::models::BotSettings;

/// The current settings; defaults to enabled when the row was never set.
pub async fn get(db: &Database) -> Result<BotSettings, FaenaError> {
    db.connection()
        .call(|conn| {
            let result = conn.query_row(
                "SELECT enabled, closed_message FROM bot_settings WHERE id = 1",
                [],
                |row| {
                    Ok(BotSettings {
                        enabled: row.get(0)?,
                        closed_message: row.get(1)?,
                    })
                },
            );
            match result {
                Ok(settings) => Ok(settings),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(BotSettings::default()),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Replace the singleton settings row.
pub async fn set(db: &Database, settings: &BotSettings) -> Result<(), FaenaError> {
    let settings = settings.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO bot_settings (id, enabled, closed_message)
                 VALUES (1, ?1, ?2)",
                params![settings.enabled, settings.closed_message],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
