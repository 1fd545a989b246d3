//! Aggregate counts and the consecutive-day streak.

use std::collections::BTreeSet;

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::session::SessionRecord;

/// Whole-log aggregates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub total_sessions: u32,
    pub total_minutes: u64,
}

/// Count and summed configured minutes over the whole log.
/// Order-independent: a permuted log yields the same totals.
pub fn totals(log: &[SessionRecord]) -> Totals {
    Totals {
        total_sessions: log.len() as u32,
        total_minutes: log.iter().map(|r| u64::from(r.duration_minutes)).sum(),
    }
}

/// Number of records completed on `today` (local calendar day).
pub fn today_count(log: &[SessionRecord], today: NaiveDate) -> usize {
    log.iter().filter(|r| r.local_day() == today).count()
}

/// [`today_count`] against the current local day.
pub fn today_count_now(log: &[SessionRecord]) -> usize {
    today_count(log, Local::now().date_naive())
}

/// Current consecutive-day streak anchored at `today`.
///
/// The distinct local days present in the log are walked from the most
/// recent; the streak grows while day `i` equals `today - i` and stops at
/// the first gap. Multiple records on one day count once. A log whose most
/// recent activity is before today yields 0.
pub fn current_streak(log: &[SessionRecord], today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = log.iter().map(|r| r.local_day()).collect();

    let mut streak = 0;
    for (i, day) in days.iter().rev().enumerate() {
        if *day == today - Duration::days(i as i64) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// [`current_streak`] against the current local day.
pub fn current_streak_now(log: &[SessionRecord]) -> u32 {
    current_streak(log, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionType, TimerMode};
    use chrono::{Datelike, TimeZone, Utc};
    use proptest::prelude::*;

    fn record_on(day: NaiveDate, minutes: u32) -> SessionRecord {
        let local = Local
            .with_ymd_and_hms(day.year(), day.month(), day.day(), 12, 0, 0)
            .unwrap();
        SessionRecord {
            completed_at: local.with_timezone(&Utc),
            duration_minutes: minutes,
            ..SessionRecord::completed(SessionType::Work, TimerMode::Work, minutes)
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn totals_sum_sessions_and_minutes() {
        let today = day(2026, 8, 6);
        let log = vec![record_on(today, 25), record_on(today, 5), record_on(today, 15)];
        assert_eq!(
            totals(&log),
            Totals {
                total_sessions: 3,
                total_minutes: 45
            }
        );
    }

    #[test]
    fn empty_log_yields_zero_everything() {
        assert_eq!(totals(&[]), Totals::default());
        assert_eq!(current_streak(&[], day(2026, 8, 6)), 0);
        assert_eq!(today_count(&[], day(2026, 8, 6)), 0);
    }

    #[test]
    fn today_count_ignores_other_days() {
        let today = day(2026, 8, 6);
        let log = vec![
            record_on(today, 25),
            record_on(today, 5),
            record_on(today - Duration::days(1), 25),
        ];
        assert_eq!(today_count(&log, today), 2);
    }

    #[test]
    fn unbroken_run_counts_every_day() {
        let today = day(2026, 8, 6);
        let log = vec![
            record_on(today, 25),
            record_on(today - Duration::days(1), 25),
            record_on(today - Duration::days(2), 25),
        ];
        assert_eq!(current_streak(&log, today), 3);
    }

    #[test]
    fn gap_at_yesterday_stops_the_streak_at_one() {
        let today = day(2026, 8, 6);
        let log = vec![record_on(today, 25), record_on(today - Duration::days(2), 25)];
        assert_eq!(current_streak(&log, today), 1);
    }

    #[test]
    fn streak_is_zero_without_a_session_today() {
        let today = day(2026, 8, 6);
        let log = vec![
            record_on(today - Duration::days(1), 25),
            record_on(today - Duration::days(2), 25),
        ];
        assert_eq!(current_streak(&log, today), 0);
    }

    #[test]
    fn duplicate_records_on_a_day_count_once_toward_the_streak() {
        let today = day(2026, 8, 6);
        let log = vec![
            record_on(today, 25),
            record_on(today, 5),
            record_on(today - Duration::days(1), 25),
        ];
        assert_eq!(current_streak(&log, today), 2);
        assert_eq!(totals(&log).total_sessions, 3);
    }

    proptest! {
        #[test]
        fn totals_are_order_invariant(minutes in proptest::collection::vec(1u32..=240, 0..60)) {
            let today = day(2026, 8, 6);
            let log: Vec<SessionRecord> =
                minutes.iter().map(|&m| record_on(today, m)).collect();

            let mut reversed = log.clone();
            reversed.reverse();
            prop_assert_eq!(totals(&log), totals(&reversed));

            let mut rotated = log.clone();
            if !log.is_empty() {
                rotated.rotate_left(log.len() / 2 + 1);
            }
            prop_assert_eq!(totals(&log), totals(&rotated));
        }

        #[test]
        fn streak_is_order_invariant(offsets in proptest::collection::vec(0i64..20, 1..40)) {
            let today = day(2026, 8, 6);
            let log: Vec<SessionRecord> = offsets
                .iter()
                .map(|&o| record_on(today - Duration::days(o), 25))
                .collect();

            let mut reversed = log.clone();
            reversed.reverse();
            prop_assert_eq!(current_streak(&log, today), current_streak(&reversed, today));
        }
    }
}
