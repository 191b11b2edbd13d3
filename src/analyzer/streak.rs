use crate::journal::date_key::parse_day_key;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakStats {
    pub current: u32,
    pub longest: u32,
    pub total: u32,
}

/// Streaks over a set of `YYYY-MM-DD` day keys, relative to `today`.
///
/// Keys that do not parse as dates are ignored. The current streak is only
/// alive when the latest key is today or yesterday.
pub fn compute_streaks<I, K>(day_keys: I, today: NaiveDate) -> StreakStats
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    let days = day_keys
        .into_iter()
        .filter_map(|key| parse_day_key(key.as_ref()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();

    let Some(&last) = days.last() else {
        return StreakStats::default();
    };

    let current = if (today - last).num_days() <= 1 {
        1 + days
            .windows(2)
            .rev()
            .take_while(|pair| gap_in_days(pair) == 1)
            .count() as u32
    } else {
        0
    };

    let (longest, _) = days
        .windows(2)
        .fold((1_u32, 1_u32), |(longest, run), pair| {
            let run = if gap_in_days(pair) == 1 { run + 1 } else { 1 };
            (longest.max(run), run)
        });

    StreakStats {
        current,
        longest: longest.max(current),
        total: days.len() as u32,
    }
}

fn gap_in_days(pair: &[NaiveDate]) -> i64 {
    (pair[1] - pair[0]).num_days()
}

#[cfg(test)]
mod tests {
    use super::{StreakStats, compute_streaks};
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_set_is_all_zero() {
        let keys: [&str; 0] = [];
        assert_eq!(compute_streaks(keys, day(2024, 1, 3)), StreakStats::default());
    }

    #[test]
    fn consecutive_days_ending_today() {
        let keys = ["2024-01-01", "2024-01-02", "2024-01-03"];

        let today = compute_streaks(keys, day(2024, 1, 3));
        assert_eq!(today, StreakStats { current: 3, longest: 3, total: 3 });

        let next_day = compute_streaks(keys, day(2024, 1, 4));
        assert_eq!(next_day.current, 3);

        let lapsed = compute_streaks(keys, day(2024, 1, 5));
        assert_eq!(lapsed, StreakStats { current: 0, longest: 3, total: 3 });
    }

    #[test]
    fn isolated_days_have_unit_longest() {
        let stats = compute_streaks(["2024-01-01", "2024-01-05"], day(2024, 6, 1));
        assert_eq!(stats, StreakStats { current: 0, longest: 1, total: 2 });
    }

    #[test]
    fn current_walks_back_from_latest_gap() {
        let keys = [
            "2024-01-10", "2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-09",
        ];
        let stats = compute_streaks(keys, day(2024, 1, 10));

        assert_eq!(stats.current, 2);
        assert_eq!(stats.longest, 4);
        assert_eq!(stats.total, 6);
    }

    #[test]
    fn duplicates_and_garbage_are_ignored() {
        let keys = ["2024-01-02", "2024-01-02", "not-a-day", "2024-01-03"];
        let stats = compute_streaks(keys, day(2024, 1, 3));

        assert_eq!(stats, StreakStats { current: 2, longest: 2, total: 2 });
    }

    #[test]
    fn streak_crosses_month_and_year_boundaries() {
        let keys = ["2023-12-30", "2023-12-31", "2024-01-01"];
        let stats = compute_streaks(keys, day(2024, 1, 1));

        assert_eq!(stats.current, 3);
        assert_eq!(stats.longest, 3);
    }

    #[test]
    fn longest_never_below_current() {
        let samples: [&[&str]; 4] = [
            &["2024-01-01"],
            &["2024-01-01", "2024-01-03"],
            &["2024-01-01", "2024-01-02", "2024-01-05", "2024-01-06", "2024-01-07"],
            &["2024-01-06", "2024-01-07"],
        ];

        for keys in samples {
            let stats = compute_streaks(keys.iter(), day(2024, 1, 7));
            assert!(stats.longest >= stats.current, "{keys:?} -> {stats:?}");
        }
    }
}
