//! Daily view heatmap.
//!
//! Raw per-day counts come from the store; this module turns them into a
//! gap-free series ending today, with each day's intensity bucketed against
//! the busiest day in the window (GitHub contribution-graph style).

use std::collections::HashMap;

use chrono::{Days, NaiveDate};

use crate::models::ViewStat;

/// Window used when the caller does not ask for a positive number of days.
pub const DEFAULT_DAYS: i64 = 53;

/// Largest window served.
pub const MAX_DAYS: i64 = 365;

/// Clamp a requested window length into `1..=MAX_DAYS`, with non-positive
/// values falling back to [`DEFAULT_DAYS`].
pub fn clamp_days(days: i64) -> u32 {
    let days = if days <= 0 { DEFAULT_DAYS } else { days.min(MAX_DAYS) };
    days as u32
}

/// First calendar day of a `days`-long window ending on `today`.
pub fn window_start(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
        .unwrap_or(NaiveDate::MIN)
}

/// Map a day's count to an intensity level in `0..=4`.
pub fn level(count: i64, max_count: i64) -> u8 {
    if max_count <= 0 {
        return 0;
    }
    let ratio = count as f64 / max_count as f64;
    if ratio > 0.8 {
        4
    } else if ratio > 0.6 {
        3
    } else if ratio > 0.4 {
        2
    } else if ratio > 0.2 {
        1
    } else {
        0
    }
}

/// Build the `days`-long series ending on `today`, ascending by date.
///
/// Days absent from `counts` are reported with a zero count.
pub fn build_series(today: NaiveDate, days: u32, counts: &HashMap<NaiveDate, i64>) -> Vec<ViewStat> {
    let start = window_start(today, days);
    let max_count = counts
        .iter()
        .filter(|(day, _)| **day >= start && **day <= today)
        .map(|(_, count)| *count)
        .max()
        .unwrap_or(0);

    start
        .iter_days()
        .take(days as usize)
        .map(|date| {
            let count = counts.get(&date).copied().unwrap_or(0);
            ViewStat {
                date,
                count,
                level: level(count, max_count),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn clamp_applies_default_and_ceiling() {
        assert_eq!(clamp_days(0), 53);
        assert_eq!(clamp_days(-7), 53);
        assert_eq!(clamp_days(1), 1);
        assert_eq!(clamp_days(365), 365);
        assert_eq!(clamp_days(366), 365);
        assert_eq!(clamp_days(10_000), 365);
    }

    #[test]
    fn series_has_requested_length_and_ends_today() {
        let today = day(2024, 3, 1);
        for days in [1u32, 2, 29, 53, 365] {
            let series = build_series(today, days, &HashMap::new());
            assert_eq!(series.len(), days as usize);
            assert_eq!(series.last().unwrap().date, today);
            assert!(series.windows(2).all(|w| w[0].date < w[1].date));
        }
    }

    #[test]
    fn empty_window_is_all_zero() {
        let series = build_series(day(2024, 1, 10), 7, &HashMap::new());
        assert!(series.iter().all(|s| s.count == 0 && s.level == 0));
    }

    #[test]
    fn single_busy_day_gets_top_level() {
        let today = day(2024, 1, 10);
        let counts = HashMap::from([(day(2024, 1, 8), 5)]);
        let series = build_series(today, 5, &counts);

        for stat in &series {
            if stat.date == day(2024, 1, 8) {
                assert_eq!((stat.count, stat.level), (5, 4));
            } else {
                assert_eq!((stat.count, stat.level), (0, 0));
            }
        }
    }

    #[test]
    fn three_day_example() {
        let today = day(2024, 6, 3);
        let counts = HashMap::from([(day(2024, 6, 1), 2), (day(2024, 6, 3), 4)]);
        let series = build_series(today, 3, &counts);

        let got: Vec<_> = series.iter().map(|s| (s.date, s.count, s.level)).collect();
        assert_eq!(
            got,
            vec![
                (day(2024, 6, 1), 2, 2),
                (day(2024, 6, 2), 0, 0),
                (day(2024, 6, 3), 4, 4),
            ]
        );
    }

    #[test]
    fn level_thresholds_are_exclusive_below() {
        assert_eq!(level(0, 0), 0);
        assert_eq!(level(2, 10), 0);
        assert_eq!(level(3, 10), 1);
        assert_eq!(level(4, 10), 1);
        assert_eq!(level(5, 10), 2);
        assert_eq!(level(6, 10), 2);
        assert_eq!(level(7, 10), 3);
        assert_eq!(level(8, 10), 3);
        assert_eq!(level(9, 10), 4);
        assert_eq!(level(10, 10), 4);
    }

    #[test]
    fn counts_outside_window_do_not_set_the_maximum() {
        let today = day(2024, 1, 10);
        let counts = HashMap::from([(day(2023, 12, 1), 100), (day(2024, 1, 10), 3)]);
        let series = build_series(today, 3, &counts);
        assert_eq!(series.last().unwrap().level, 4);
    }
}
