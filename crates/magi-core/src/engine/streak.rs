//! Streak counting over a habit's completion dates.
//!
//! The current streak walks backwards from a reference date. The reference
//! date itself may be missing without breaking the chain: a streak stays
//! alive until the day is over. Any missing day before it ends the walk.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};

use super::completion::CompletionLog;
use crate::model::Habit;

/// Default number of days inspected by [`compute_streak`].
pub const DEFAULT_HORIZON_DAYS: u32 = 365;

/// Current streak as of `as_of`, capped at [`DEFAULT_HORIZON_DAYS`].
pub fn compute_streak(dates: &BTreeSet<NaiveDate>, as_of: NaiveDate) -> u32 {
    compute_streak_within(dates, as_of, DEFAULT_HORIZON_DAYS)
}

/// Current streak as of `as_of`, inspecting at most `horizon_days` days
/// (offsets `0..horizon_days`).
pub fn compute_streak_within(
    dates: &BTreeSet<NaiveDate>,
    as_of: NaiveDate,
    horizon_days: u32,
) -> u32 {
    if dates.is_empty() {
        return 0;
    }

    let mut streak = 0;
    for offset in 0..horizon_days {
        let Some(day) = as_of.checked_sub_days(Days::new(u64::from(offset))) else {
            break;
        };
        if dates.contains(&day) {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }
    streak
}

/// Longest run of consecutive calendar days anywhere in `dates`.
pub fn longest_streak(dates: &BTreeSet<NaiveDate>) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for &day in dates {
        run = match previous.and_then(|p| p.succ_opt()) {
            Some(next) if next == day => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(day);
    }
    best
}

/// Highest current streak among active habits (0 when there are none).
pub fn best_current_streak(
    habits: &[Habit],
    log: &CompletionLog,
    as_of: NaiveDate,
    horizon_days: u32,
) -> u32 {
    habits
        .iter()
        .filter(|h| h.active)
        .map(|h| compute_streak_within(log.dates(&h.id), as_of, horizon_days))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn set(days: &[&str]) -> BTreeSet<NaiveDate> {
        days.iter().map(|d| date(d)).collect()
    }

    #[test]
    fn empty_set_is_zero() {
        assert_eq!(compute_streak(&BTreeSet::new(), date("2026-01-07")), 0);
    }

    #[test]
    fn single_completion_today() {
        assert_eq!(compute_streak(&set(&["2026-01-07"]), date("2026-01-07")), 1);
    }

    #[test]
    fn today_missing_does_not_break_chain() {
        // Yesterday done, today not yet, the day before missing.
        let dates = set(&["2026-01-06"]);
        assert_eq!(compute_streak(&dates, date("2026-01-07")), 1);
    }

    #[test]
    fn yesterday_run_still_counts() {
        let dates = set(&["2026-01-04", "2026-01-05", "2026-01-06"]);
        assert_eq!(compute_streak(&dates, date("2026-01-07")), 3);
    }

    #[test]
    fn gap_at_offset_one_ends_walk() {
        let dates = set(&["2026-01-05", "2026-01-07"]);
        assert_eq!(compute_streak(&dates, date("2026-01-07")), 1);
    }

    #[test]
    fn only_older_dates_give_zero() {
        let dates = set(&["2026-01-01", "2026-01-02"]);
        assert_eq!(compute_streak(&dates, date("2026-01-07")), 0);
    }

    #[test]
    fn lectura_diaria_scenario() {
        let dates = set(&["2026-01-05", "2026-01-06", "2026-01-07"]);
        assert_eq!(compute_streak(&dates, date("2026-01-07")), 3);
    }

    #[test]
    fn future_dates_are_ignored() {
        let dates = set(&["2026-01-07", "2026-01-08"]);
        assert_eq!(compute_streak(&dates, date("2026-01-07")), 1);
    }

    #[test]
    fn horizon_caps_the_walk() {
        let as_of = date("2026-12-31");
        let dates: BTreeSet<NaiveDate> = (0..400u64)
            .map(|i| as_of.checked_sub_days(Days::new(i)).unwrap())
            .collect();
        assert_eq!(compute_streak(&dates, as_of), 365);
        assert_eq!(compute_streak_within(&dates, as_of, 30), 30);
        assert_eq!(compute_streak_within(&dates, as_of, 0), 0);
    }

    #[test]
    fn longest_run_anywhere() {
        let dates = set(&[
            "2026-01-01",
            "2026-01-02",
            "2026-01-03",
            "2026-01-10",
            "2026-01-11",
        ]);
        assert_eq!(longest_streak(&dates), 3);
        assert_eq!(longest_streak(&BTreeSet::new()), 0);
    }

    #[test]
    fn longest_run_across_month_boundary() {
        let dates = set(&["2026-01-30", "2026-01-31", "2026-02-01"]);
        assert_eq!(longest_streak(&dates), 3);
    }

    proptest! {
        #[test]
        fn consecutive_run_ending_today_counts_fully(
            n in 1u32..=365,
            start in 0i64..3000,
        ) {
            let today = date("2020-01-01") + chrono::Duration::days(start);
            let dates: BTreeSet<NaiveDate> = (0..n)
                .map(|i| today.checked_sub_days(Days::new(u64::from(i))).unwrap())
                .collect();
            prop_assert_eq!(compute_streak(&dates, today), n);
            prop_assert_eq!(longest_streak(&dates), n);
        }

        #[test]
        fn streak_never_exceeds_set_size(
            offsets in proptest::collection::btree_set(0u64..60, 0..40),
        ) {
            let today = date("2026-06-30");
            let dates: BTreeSet<NaiveDate> = offsets
                .iter()
                .map(|o| today.checked_sub_days(Days::new(*o)).unwrap())
                .collect();
            let streak = compute_streak(&dates, today);
            prop_assert!(streak as usize <= dates.len());
            prop_assert!(streak <= longest_streak(&dates));
        }
    }
}
