//! Streak arithmetic over UTC calendar days.
//!
//! A "day" is the UTC calendar date of an instant. Two instants are compared
//! by the whole number of days between their UTC dates, so 23:59 and 00:01
//! on consecutive dates are one day apart while 00:01 and 23:59 on the same
//! date are zero days apart.

use chrono::{DateTime, Duration, NaiveTime, Utc};

/// Result of applying a check-in at `now` to a habit's streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    // ---
    pub streak: i32,
    pub last_checkin: DateTime<Utc>,
}

/// Start of the UTC calendar day containing `at`.
pub fn start_of_utc_day(at: DateTime<Utc>) -> DateTime<Utc> {
    // ---
    at.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Half-open window `[start, end)` covering the UTC day containing `at`.
pub fn utc_day_window(at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    // ---
    let start = start_of_utc_day(at);
    (start, start + Duration::days(1))
}

/// Whole UTC days from `earlier` to `later`. Negative when `earlier` is in the future.
pub fn utc_day_difference(later: DateTime<Utc>, earlier: DateTime<Utc>) -> i64 {
    // ---
    later
        .date_naive()
        .signed_duration_since(earlier.date_naive())
        .num_days()
}

/// Computes the streak produced by a check-in at `now`.
///
/// - no previous check-in: 1
/// - previous check-in on the preceding UTC day: `previous_streak + 1`
/// - previous check-in on the same UTC day: unchanged
/// - anything else, including a previous check-in in the future: 1
pub fn next_streak(
    previous_streak: i32,
    last_checkin: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> StreakUpdate {
    // ---
    let streak = match last_checkin.map(|last| utc_day_difference(now, last)) {
        None => 1,
        Some(1) => previous_streak.saturating_add(1),
        Some(0) => previous_streak,
        Some(_) => 1,
    };

    StreakUpdate {
        streak,
        last_checkin: now,
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn first_checkin_starts_at_one() {
        // ---
        let now = at(2024, 3, 10, 8, 0);
        let update = next_streak(0, None, now);

        assert_eq!(update.streak, 1);
        assert_eq!(update.last_checkin, now);
    }

    #[test]
    fn consecutive_day_increments() {
        // ---
        let update = next_streak(4, Some(at(2024, 3, 10, 8, 0)), at(2024, 3, 11, 21, 30));
        assert_eq!(update.streak, 5);
    }

    #[test]
    fn gap_of_two_or_more_days_resets() {
        // ---
        let last = at(2024, 3, 10, 8, 0);

        assert_eq!(next_streak(7, Some(last), at(2024, 3, 12, 0, 0)).streak, 1);
        assert_eq!(next_streak(7, Some(last), at(2024, 4, 30, 12, 0)).streak, 1);
    }

    #[test]
    fn same_day_leaves_streak_unchanged() {
        // ---
        let update = next_streak(3, Some(at(2024, 3, 10, 0, 1)), at(2024, 3, 10, 23, 59));

        assert_eq!(update.streak, 3);
        assert_eq!(update.last_checkin, at(2024, 3, 10, 23, 59));
    }

    #[test]
    fn midnight_crossing_counts_as_next_day() {
        // ---
        let update = next_streak(1, Some(at(2024, 3, 10, 23, 59)), at(2024, 3, 11, 0, 1));
        assert_eq!(update.streak, 2);
    }

    #[test]
    fn leap_day_transitions_are_consecutive() {
        // ---
        let into_leap = next_streak(2, Some(at(2024, 2, 28, 12, 0)), at(2024, 2, 29, 12, 0));
        let out_of_leap = next_streak(3, Some(at(2024, 2, 29, 12, 0)), at(2024, 3, 1, 12, 0));
        let non_leap_year = next_streak(2, Some(at(2023, 2, 28, 12, 0)), at(2023, 3, 1, 12, 0));

        assert_eq!(into_leap.streak, 3);
        assert_eq!(out_of_leap.streak, 4);
        assert_eq!(non_leap_year.streak, 3);
    }

    #[test]
    fn future_last_checkin_resets() {
        // ---
        let update = next_streak(9, Some(at(2024, 3, 12, 8, 0)), at(2024, 3, 11, 8, 0));
        assert_eq!(update.streak, 1);
    }

    #[test]
    fn day_window_is_half_open_utc_day() {
        // ---
        let (start, end) = utc_day_window(at(2024, 12, 31, 23, 59));

        assert_eq!(start, at(2024, 12, 31, 0, 0));
        assert_eq!(end, at(2025, 1, 1, 0, 0));
    }

    #[test]
    fn day_difference_ignores_time_of_day() {
        // ---
        assert_eq!(utc_day_difference(at(2024, 3, 11, 0, 0), at(2024, 3, 10, 23, 59)), 1);
        assert_eq!(utc_day_difference(at(2024, 3, 10, 23, 59), at(2024, 3, 10, 0, 0)), 0);
        assert_eq!(utc_day_difference(at(2024, 3, 9, 0, 0), at(2024, 3, 10, 0, 0)), -1);
    }
}
