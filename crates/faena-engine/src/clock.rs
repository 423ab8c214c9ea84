// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure calendar helpers: allowed booking dates, slot-time comparison,
//! Spanish day labels.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

const DAY_NAMES: [&str; 7] = ["Lun", "Mar", "Mié", "Jue", "Vie", "Sáb", "Dom"];

/// Dates strictly after `today`, up to `days_ahead` days out, Monday
/// through Saturday only, ascending.
pub fn allowed_dates(today: NaiveDate, days_ahead: u32) -> Vec<NaiveDate> {
    (1..=i64::from(days_ahead))
        .map(|i| today + Duration::days(i))
        .filter(|d| d.weekday() != Weekday::Sun)
        .collect()
}

/// Whether an HH:MM slot has not yet passed. Zero-padded fixed-width
/// times make the lexicographic comparison correct.
pub fn is_future_slot(hhmm: &str, now_hhmm: &str) -> bool {
    hhmm >= now_hhmm
}

/// Weekday number, 1=Monday .. 7=Sunday.
pub fn weekday_number(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

/// Short Spanish label like "Lun 09/02".
pub fn day_label(date: NaiveDate) -> String {
    let name = DAY_NAMES[date.weekday().num_days_from_monday() as usize];
    format!("{} {:02}/{:02}", name, date.day(), date.month())
}
