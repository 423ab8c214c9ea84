// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Availability resolver: combines the weekly schedule template with
//! already-booked turn orders. Pure function of template + orders; same
//! inputs, same answer.

use chrono::NaiveDate;

use faena_core::types::DeliveryMode;
use faena_core::{FaenaError, Repository};

use crate::clock;

/// How a date is being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityMode {
    /// Needs a free turn slot on the date.
    Turn,
    /// Any scheduled day works; direct orders never exhaust slots.
    Direct,
    /// Unrestricted listing (the "see schedule" menu entry).
    Browse,
}

impl From<DeliveryMode> for AvailabilityMode {
    fn from(mode: DeliveryMode) -> Self {
        match mode {
            DeliveryMode::Turn => AvailabilityMode::Turn,
            DeliveryMode::Direct => AvailabilityMode::Direct,
        }
    }
}

/// Allowed booking dates restricted to weekdays with a schedule template.
pub async fn dates_with_schedule(
    repo: &dyn Repository,
    today: NaiveDate,
    days_ahead: u32,
) -> Result<Vec<NaiveDate>, FaenaError> {
    let weekdays = repo.weekdays_with_schedule().await?;
    Ok(clock::allowed_dates(today, days_ahead)
        .into_iter()
        .filter(|d| weekdays.contains(&clock::weekday_number(*d)))
        .collect())
}

/// Whether a date can take an order in the given mode.
pub async fn day_has_availability(
    repo: &dyn Repository,
    date: NaiveDate,
    mode: AvailabilityMode,
) -> Result<bool, FaenaError> {
    let Some(template) = repo.schedule_for_weekday(clock::weekday_number(date)).await? else {
        return Ok(false);
    };

    match mode {
        AvailabilityMode::Direct | AvailabilityMode::Browse => Ok(true),
        AvailabilityMode::Turn => {
            let booked = repo.booked_turn_times(date).await?;
            Ok(template.slots.iter().any(|slot| !booked.contains(slot)))
        }
    }
}

/// Template slots for the date minus booked turn slots; when the date is
/// today, slots whose time already passed are also dropped.
pub async fn free_slots_for_date(
    repo: &dyn Repository,
    date: NaiveDate,
    today: NaiveDate,
    now_hhmm: &str,
) -> Result<Vec<String>, FaenaError> {
    let Some(template) = repo.schedule_for_weekday(clock::weekday_number(date)).await? else {
        return Ok(Vec::new());
    };

    let booked = repo.booked_turn_times(date).await?;
    Ok(template
        .slots
        .into_iter()
        .filter(|slot| !booked.contains(slot))
        .filter(|slot| date != today || clock::is_future_slot(slot, now_hhmm))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use faena_core::Repository;
    use faena_core::types::{DeliveryMode, Order, OrderStatus, ScheduleDay};
    use faena_storage::SqliteStore;
    use tempfile::tempdir;

    async fn store_with_monday_slots(dir: &tempfile::TempDir) -> SqliteStore {
        let db_path = dir.path().join("availability.db");
        let store = SqliteStore::open(&faena_config::StorageConfig {
            database_path: db_path.to_str().unwrap().to_string(),
        })
        .await
        .unwrap();
        store
            .upsert_schedule_day(&ScheduleDay {
                weekday: 1,
                name: "Lunes".to_string(),
                slots: vec!["09:00".to_string(), "10:00".to_string()],
            })
            .await
            .unwrap();
        store
    }

    fn turn_order(id: &str, date: NaiveDate, time: &str) -> Order {
        Order {
            id: id.to_string(),
            phone: "5491100000001".to_string(),
            customer_name: "Juan Perez".to_string(),
            pickup_person: "Juan Perez".to_string(),
            date,
            time: Some(time.to_string()),
            mode: DeliveryMode::Turn,
            items: vec![],
            status: OrderStatus::Reserved,
            closing: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn availability_is_stable_for_unchanged_storage() {
        let dir = tempdir().unwrap();
        let store = store_with_monday_slots(&dir).await;
        // 2026-09-07 is a Monday.
        let monday: NaiveDate = "2026-09-07".parse().unwrap();

        let first = day_has_availability(&store, monday, AvailabilityMode::Turn)
            .await
            .unwrap();
        let second = day_has_availability(&store, monday, AvailabilityMode::Turn)
            .await
            .unwrap();
        assert!(first);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn fully_booked_day_has_no_turn_availability() {
        let dir = tempdir().unwrap();
        let store = store_with_monday_slots(&dir).await;
        let monday: NaiveDate = "2026-09-07".parse().unwrap();

        store
            .create_order(&turn_order("a", monday, "09:00"))
            .await
            .unwrap();
        store
            .create_order(&turn_order("b", monday, "10:00"))
            .await
            .unwrap();

        assert!(
            !day_has_availability(&store, monday, AvailabilityMode::Turn)
                .await
                .unwrap()
        );
        // Direct pickups never exhaust slots.
        assert!(
            day_has_availability(&store, monday, AvailabilityMode::Direct)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn free_slots_drop_booked_and_past_times() {
        let dir = tempdir().unwrap();
        let store = store_with_monday_slots(&dir).await;
        let monday: NaiveDate = "2026-09-07".parse().unwrap();

        store
            .create_order(&turn_order("a", monday, "09:00"))
            .await
            .unwrap();

        let future_day: NaiveDate = "2026-09-01".parse().unwrap();
        let slots = free_slots_for_date(&store, monday, future_day, "23:00")
            .await
            .unwrap();
        assert_eq!(slots, vec!["10:00"]);

        // Same date as "today": times already past are dropped too.
        let slots = free_slots_for_date(&store, monday, monday, "09:30")
            .await
            .unwrap();
        assert_eq!(slots, vec!["10:00"]);
        let slots = free_slots_for_date(&store, monday, monday, "11:00")
            .await
            .unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn days_without_a_template_are_excluded() {
        let dir = tempdir().unwrap();
        let store = store_with_monday_slots(&dir).await;
        let today: NaiveDate = "2026-09-01".parse().unwrap();

        let dates = dates_with_schedule(&store, today, 14).await.unwrap();
        assert!(!dates.is_empty());
        assert!(dates.iter().all(|d| clock::weekday_number(*d) == 1));
    }
}
