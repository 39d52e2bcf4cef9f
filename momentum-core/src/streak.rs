//! Streak calculator: consecutive-day runs over a set of completion dates.
//!
//! The walk starts at "today" and steps back one calendar day at a time
//! until the first missing day. Only the run touching the anchor counts;
//! longer historical runs do not.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Where the backward walk may start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreakAnchor {
    /// The run must include today; an incomplete today means streak 0.
    #[default]
    Today,
    /// If today is not done yet, the run ending yesterday still counts.
    TodayOrYesterday,
}

/// Current streak ending at `today` (or yesterday, per `anchor`).
///
/// Duplicate dates are tolerated.
pub fn current_streak<'a, I>(dates: I, today: NaiveDate, anchor: StreakAnchor) -> u32
where
    I: IntoIterator<Item = &'a NaiveDate>,
{
    let set: BTreeSet<NaiveDate> = dates.into_iter().copied().collect();
    if set.is_empty() {
        return 0;
    }

    let start = match anchor {
        StreakAnchor::Today => today,
        StreakAnchor::TodayOrYesterday if set.contains(&today) => today,
        StreakAnchor::TodayOrYesterday => match today.pred_opt() {
            Some(yesterday) => yesterday,
            None => return 0,
        },
    };

    run_ending_at(&set, start)
}

/// Longest run of consecutive days anywhere in `dates`.
pub fn longest_streak<'a, I>(dates: I) -> u32
where
    I: IntoIterator<Item = &'a NaiveDate>,
{
    let set: BTreeSet<NaiveDate> = dates.into_iter().copied().collect();

    let mut best = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;

    for d in set {
        run = match prev.and_then(|p| p.succ_opt()) {
            Some(next) if next == d => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(d);
    }

    best
}

/// Activity streak bonus tiers: <3, 3-6, 7-13, 14-29, >=30 days.
pub fn streak_bonus(activity_streak: u32) -> u32 {
    match activity_streak {
        0..=2 => 0,
        3..=6 => 2,
        7..=13 => 5,
        14..=29 => 7,
        _ => 10,
    }
}

fn run_ending_at(set: &BTreeSet<NaiveDate>, start: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut cursor = Some(start);

    while let Some(day) = cursor {
        if !set.contains(&day) {
            break;
        }
        streak += 1;
        cursor = day.pred_opt();
    }

    streak
}
