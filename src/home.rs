//! Home screen: today's journal counts.
//!
//! "Today" is the user's local calendar day, unlike the epoch buckets the
//! insights analysis uses.

use chrono::{Local, NaiveDate, TimeZone, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::repository::{
    count_critical_symptoms_between, count_food_entries_between, count_symptom_entries_between,
};
use crate::db::DatabaseError;
use crate::insights::{day_id, DAY_MS};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Counts for the home header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayStats {
    pub day_start_ms: i64,
    pub food_count: u32,
    pub symptom_count: u32,
    /// Any very severe or critical symptom logged today.
    pub has_critical_symptoms: bool,
}

// ---------------------------------------------------------------------------
// Day bounds
// ---------------------------------------------------------------------------

/// Half-open `[start, end)` millisecond bounds of `date` in `tz`.
/// `None` when midnight does not exist there (DST gap) or is out of range.
pub fn day_bounds_in<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<(i64, i64)> {
    let start = tz.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest()?;
    let next = date.succ_opt()?;
    let end = tz.from_local_datetime(&next.and_hms_opt(0, 0, 0)?).earliest()?;
    Some((start.timestamp_millis(), end.timestamp_millis()))
}

/// Local-midnight bounds of `date`.
pub fn local_day_bounds(date: NaiveDate) -> Option<(i64, i64)> {
    day_bounds_in(&Local, date)
}

// ---------------------------------------------------------------------------
// Repository functions
// ---------------------------------------------------------------------------

/// Journal counts within `[day_start_ms, day_end_ms)`.
pub fn today_stats(
    conn: &Connection,
    day_start_ms: i64,
    day_end_ms: i64,
) -> Result<TodayStats, DatabaseError> {
    let food_count = count_food_entries_between(conn, day_start_ms, day_end_ms)?;
    let symptom_count = count_symptom_entries_between(conn, day_start_ms, day_end_ms)?;
    let critical = count_critical_symptoms_between(conn, day_start_ms, day_end_ms)?;

    Ok(TodayStats {
        day_start_ms,
        food_count,
        symptom_count,
        has_critical_symptoms: critical > 0,
    })
}

/// Counts for the current local day. Falls back to the UTC day when local
/// midnight cannot be resolved.
pub fn today_stats_now(conn: &Connection) -> Result<TodayStats, DatabaseError> {
    let today = Local::now().date_naive();
    let (start, end) = local_day_bounds(today)
        .or_else(|| day_bounds_in(&Utc, today))
        .unwrap_or_else(|| {
            let start = day_id(Utc::now().timestamp_millis()) * DAY_MS;
            (start, start + DAY_MS)
        });
    today_stats(conn, start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    use crate::db::repository::{insert_food_entry, insert_symptom_entry};
    use crate::db::sqlite::open_memory_database;
    use crate::models::{FoodEntry, MealCategory, SymptomEntry, SymptomSeverity, SymptomType};

    const HOUR_MS: i64 = 3_600_000;

    fn march_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn utc_bounds_cover_one_day() {
        let (start, end) = day_bounds_in(&Utc, march_15()).unwrap();
        assert_eq!(start, 1_710_460_800_000);
        assert_eq!(end - start, 24 * HOUR_MS);
    }

    #[test]
    fn offset_bounds_shift_midnight() {
        let almaty = FixedOffset::east_opt(5 * 3600).unwrap();
        let (start, _) = day_bounds_in(&almaty, march_15()).unwrap();
        assert_eq!(start, 1_710_460_800_000 - 5 * HOUR_MS);
    }

    #[test]
    fn empty_day_has_zero_counts() {
        let conn = open_memory_database().unwrap();
        let (start, end) = day_bounds_in(&Utc, march_15()).unwrap();
        let stats = today_stats(&conn, start, end).unwrap();
        assert_eq!(
            stats,
            TodayStats {
                day_start_ms: start,
                food_count: 0,
                symptom_count: 0,
                has_critical_symptoms: false,
            }
        );
    }

    #[test]
    fn counts_only_entries_inside_the_day() {
        let conn = open_memory_database().unwrap();
        let (start, end) = day_bounds_in(&Utc, march_15()).unwrap();

        insert_food_entry(&conn, &FoodEntry::new("Egg", MealCategory::Breakfast, start)).unwrap();
        insert_food_entry(&conn, &FoodEntry::new("Rice", MealCategory::Lunch, start + 12 * HOUR_MS)).unwrap();
        insert_food_entry(&conn, &FoodEntry::new("Late", MealCategory::Snack, end)).unwrap();
        insert_food_entry(&conn, &FoodEntry::new("Early", MealCategory::Snack, start - 1)).unwrap();
        insert_symptom_entry(
            &conn,
            &SymptomEntry::new(SymptomType::Nausea, SymptomSeverity::Severe, start + HOUR_MS),
        )
        .unwrap();

        let stats = today_stats(&conn, start, end).unwrap();
        assert_eq!(stats.food_count, 2);
        assert_eq!(stats.symptom_count, 1);
        // SEVERE alone does not raise the flag.
        assert!(!stats.has_critical_symptoms);
    }

    #[test]
    fn very_severe_symptom_raises_flag() {
        let conn = open_memory_database().unwrap();
        let (start, end) = day_bounds_in(&Utc, march_15()).unwrap();
        insert_symptom_entry(
            &conn,
            &SymptomEntry::new(SymptomType::Headache, SymptomSeverity::VerySevere, start + HOUR_MS),
        )
        .unwrap();

        assert!(today_stats(&conn, start, end).unwrap().has_critical_symptoms);
    }

    #[test]
    fn today_stats_now_runs_against_empty_db() {
        let conn = open_memory_database().unwrap();
        let stats = today_stats_now(&conn).unwrap();
        assert_eq!(stats.food_count, 0);
    }
}
