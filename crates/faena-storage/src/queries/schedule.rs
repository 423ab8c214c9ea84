// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weekly schedule template operations. Slots are stored as a JSON array
//! of zero-padded "HH:MM" strings.

use faena_core::FaenaError;
use rusqlite::params;

use crate::database::Database;
use crate::models::ScheduleDay;

fn row_to_day(row: &rusqlite::Row<'_>) -> Result<ScheduleDay, rusqlite::Error> {
    let weekday: u8 = row.get(0)?;
    let name: String = row.get(1)?;
    let slots: String = row.get(2)?;
    let slots: Vec<String> = serde_json::from_str(&slots).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(ScheduleDay {
        weekday,
        name,
        slots,
    })
}

/// Template for one weekday (1=Monday .. 6=Saturday), if configured.
pub async fn for_weekday(db: &Database, weekday: u8) -> Result<Option<ScheduleDay>, FaenaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT weekday, name, slots FROM schedule_days WHERE weekday = ?1",
            )?;
            let result = stmt.query_row(params![weekday], row_to_day);
            match result {
                Ok(day) => Ok(Some(day)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Weekday numbers that have a configured template, ascending.
pub async fn weekdays(db: &Database) -> Result<Vec<u8>, FaenaError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare("SELECT weekday FROM schedule_days ORDER BY weekday")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            let mut days = Vec::new();
            for row in rows {
                days.push(row?);
            }
            Ok(days)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert or replace a weekday template (seeding and admin edits).
pub async fn upsert(db: &Database, day: &ScheduleDay) -> Result<(), FaenaError> {
    let slots = serde_json::to_string(&day.slots).map_err(|e| FaenaError::Storage {
        source: Box::new(e),
    })?;
    let weekday = day.weekday;
    let name = day.name.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO schedule_days (weekday, name, slots)
                 VALUES (?1, ?2, ?3)",
                params![weekday, name, slots],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn monday() -> ScheduleDay {
        ScheduleDay {
            weekday: 1,
            name: "Lunes".to_string(),
            slots: vec!["09:00".into(), "10:00".into(), "11:00".into()],
        }
    }

    #[tokio::test]
    async fn upsert_and_fetch_weekday_roundtrips() {
        let (db, _dir) = setup_db().await;
        upsert(&db, &monday()).await.unwrap();

        let day = for_weekday(&db, 1).await.unwrap().unwrap();
        assert_eq!(day.name, "Lunes");
        assert_eq!(day.slots, vec!["09:00", "10:00", "11:00"]);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn unconfigured_weekday_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(for_weekday(&db, 3).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn weekdays_lists_configured_days_ascending() {
        let (db, _dir) = setup_db().await;
        upsert(
            &db,
            &ScheduleDay {
                weekday: 6,
                name: "Sábado".to_string(),
                slots: vec!["09:00".into()],
            },
        )
        .await
        .unwrap();
        upsert(&db, &monday()).await.unwrap();

        assert_eq!(weekdays(&db).await.unwrap(), vec![1, 6]);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn upsert_replaces_existing_template() {
        let (db, _dir) = setup_db().await;
        upsert(&db, &monday()).await.unwrap();
        upsert(
            &db,
            &ScheduleDay {
                weekday: 1,
                name: "Lunes".to_string(),
                slots: vec!["14:00".into()],
            },
        )
        .await
        .unwrap();

        let day = for_weekday(&db, 1).await.unwrap().unwrap();
        assert_eq!(day.slots, vec!["14:00"]);

        db.close().await.unwrap();
    }
}
