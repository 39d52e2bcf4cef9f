//! Task model consumed by the point engine.
//!
//! Tasks are owned by the surrounding application; the engine only reads
//! them. The one transition it cares about is Pending -> Completed, with a
//! short undo window for accidental completions.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::TaskError;
use crate::time::day_of;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,

    /// Free-form label used for weighting and icon heuristics.
    pub category: String,

    pub start_time: DateTime<Utc>,

    /// Minutes.
    pub planned_duration: i32,

    pub status: TaskStatus,

    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,

    /// Completed while a focus-timer session was running.
    #[serde(default)]
    pub focus_session: bool,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            start_time,
            planned_duration: 30,
            status: TaskStatus::Pending,
            completed_at: None,
            focus_session: false,
        }
    }

    pub fn with_duration(mut self, minutes: i32) -> Self {
        self.planned_duration = minutes;
        self
    }

    /// Mark completed at `now` (builder form, mostly for tests and fixtures).
    pub fn completed(mut self, now: DateTime<Utc>, focus_session: bool) -> Self {
        self.status = TaskStatus::Completed;
        self.completed_at = Some(now);
        self.focus_session = focus_session;
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn complete(&mut self, now: DateTime<Utc>, focus_session: bool) -> Result<(), TaskError> {
        if self.is_completed() {
            return Err(TaskError::AlreadyCompleted(self.id.clone()));
        }
        self.status = TaskStatus::Completed;
        self.completed_at = Some(now);
        self.focus_session = focus_session;
        Ok(())
    }

    /// Revert a completion made no more than `grace` ago.
    pub fn undo_completion(&mut self, now: DateTime<Utc>, grace: Duration) -> Result<(), TaskError> {
        if !self.is_completed() {
            return Err(TaskError::NotCompleted(self.id.clone()));
        }
        // A completion without a timestamp predates undo tracking; treat it as final.
        let completed_at = self.completed_at.unwrap_or(DateTime::<Utc>::MIN_UTC);
        let closed_at = completed_at + grace;
        if now > closed_at {
            return Err(TaskError::UndoWindowClosed {
                id: self.id.clone(),
                closed_at,
            });
        }
        self.status = TaskStatus::Pending;
        self.completed_at = None;
        self.focus_session = false;
        Ok(())
    }

    /// Calendar day the task is scheduled on, in `tz`.
    pub fn due_day(&self, tz: Tz) -> NaiveDate {
        day_of(self.start_time, tz)
    }

    /// Calendar day the task was finished on, in `tz`. A completion without a
    /// timestamp is credited to the day it was scheduled.
    pub fn completion_day(&self, tz: Tz) -> Option<NaiveDate> {
        if !self.is_completed() {
            return None;
        }
        Some(match self.completed_at {
            Some(at) => day_of(at, tz),
            None => self.due_day(tz),
        })
    }
}

/// Tasks scheduled on `day` in `tz`.
pub fn tasks_due_on(tasks: &[Task], day: NaiveDate, tz: Tz) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| t.due_day(tz) == day)
        .cloned()
        .collect()
}

/// Tasks finished on `day` in `tz`, wherever they were scheduled.
pub fn tasks_completed_on(tasks: &[Task], day: NaiveDate, tz: Tz) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| t.completion_day(tz) == Some(day))
        .cloned()
        .collect()
}

/// Every day on which at least one task was finished.
pub fn completion_days(tasks: &[Task], tz: Tz) -> BTreeSet<NaiveDate> {
    tasks.iter().filter_map(|t| t.completion_day(tz)).collect()
}
