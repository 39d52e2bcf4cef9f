//! Point engine: converts completed tasks into gamification points.
//!
//! Per task (steps 1-5):
//! - base points, weighted by category
//! - scaled by the health multiplier (energy x sleep)
//! - snapped to a multiple of 5 (remainder <= 2 down, > 2 up)
//! - plus a flat bonus when completed during a focus session
//!
//! Per day (steps 6-9):
//! - points of the tasks finished that day summed and capped
//! - plus the activity streak bonus
//! - plus round5(completion rate % x 0.5), over the tasks scheduled that day
//! - the total snapped to a multiple of 5 again

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::health::HealthSnapshot;
use crate::streak::streak_bonus;
use crate::styling::CategoryColors;
use crate::task::{tasks_completed_on, tasks_due_on, Task};

// Multipliers like 1.1 x 1.1 are not exact in binary; without a tolerance
// a raw 12.0 can land on 12.000000000000002 and round up.
const ROUNDING_EPSILON: f64 = 1e-9;

/// Snap to a multiple of 5: remainder <= 2 rounds down, > 2 rounds up.
///
/// Deliberately not standard rounding: 12.5 -> 15, 12 -> 10, 13 -> 15.
pub fn round5(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let floor = (value / 5.0).floor() * 5.0;
    let remainder = value - floor;
    let snapped = if remainder > 2.0 + ROUNDING_EPSILON {
        floor + 5.0
    } else {
        floor
    };
    snapped as u32
}

/// Category -> weight table (exact, case-sensitive match; unknown = 1.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryWeights(pub BTreeMap<String, f64>);

impl CategoryWeights {
    pub fn weight(&self, category: &str) -> f64 {
        self.0.get(category).copied().unwrap_or(1.0)
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        let table = [
            ("Deep Work", 2.0),
            ("Learning", 1.8),
            ("Meeting", 1.2),
            ("Admin", 0.8),
        ];
        Self(
            table
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub base_points: u32,
    pub daily_cap: u32,
    pub session_bonus: u32,
    pub category_weights: CategoryWeights,
    pub category_colors: CategoryColors,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            base_points: 10,
            daily_cap: 100,
            session_bonus: 5,
            category_weights: CategoryWeights::default(),
            category_colors: CategoryColors::default(),
        }
    }
}

/// Streak information the day score depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakContext {
    /// Consecutive days of any qualifying activity, including the scored day.
    pub activity_streak: u32,
}

/// Breakdown of one day's score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyScore {
    /// Scheduled on the day.
    pub tasks_due: usize,
    /// Scheduled on the day and completed (any day).
    pub tasks_due_completed: usize,
    /// Finished on the day, wherever they were scheduled.
    pub tasks_completed: usize,
    /// Sum of per-task points before the cap.
    pub raw_task_points: u32,
    /// After the daily cap.
    pub task_points: u32,
    pub streak_bonus: u32,
    /// 0-100.
    pub completion_rate: f64,
    pub completion_bonus: u32,
    pub total: u32,
}

/// Unrounded points for one completed task (steps 1-3).
pub fn raw_task_points(task: &Task, health: &HealthSnapshot, policy: &ScoringPolicy) -> f64 {
    policy.base_points as f64 * policy.category_weights.weight(&task.category) * health.multiplier()
}

/// Points for one completed task (steps 1-5). Pending tasks score 0.
pub fn score_completed_task(task: &Task, health: &HealthSnapshot, policy: &ScoringPolicy) -> u32 {
    if !task.is_completed() {
        return 0;
    }
    let mut points = round5(raw_task_points(task, health, policy));
    if task.focus_session {
        points += policy.session_bonus;
    }
    points
}

/// Score `day` (steps 6-9).
///
/// Points come from the tasks finished on `day`; the completion rate is over
/// the tasks scheduled on `day`. Both are judged in `tz`.
pub fn score_day(
    tasks: &[Task],
    day: NaiveDate,
    tz: Tz,
    health: &HealthSnapshot,
    streak: StreakContext,
    policy: &ScoringPolicy,
) -> DailyScore {
    let due = tasks_due_on(tasks, day, tz);
    let finished = tasks_completed_on(tasks, day, tz);

    let raw_task_points: u32 = finished
        .iter()
        .map(|t| score_completed_task(t, health, policy))
        .sum();
    let task_points = raw_task_points.min(policy.daily_cap);

    let due_completed = due.iter().filter(|t| t.is_completed()).count();
    let completion_rate = if due.is_empty() {
        0.0
    } else {
        due_completed as f64 / due.len() as f64 * 100.0
    };
    let completion_bonus = round5(completion_rate * 0.5);
    let streak_bonus = streak_bonus(streak.activity_streak);

    let total = round5((task_points + streak_bonus + completion_bonus) as f64);

    DailyScore {
        tasks_due: due.len(),
        tasks_due_completed: due_completed,
        tasks_completed: finished.len(),
        raw_task_points,
        task_points,
        streak_bonus,
        completion_rate,
        completion_bonus,
        total,
    }
}
