//! Score ledger: what the engine has observed, one record per day.
//!
//! Cumulative points, the level, and the activity streak are all derived
//! from this ledger. Re-scoring a day replaces its record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;
use crate::kv::{load_json, save_json, KeyValueStore, Loaded};
use crate::level::{resolve_level, Level};
use crate::points::DailyScore;
use crate::streak::{current_streak, StreakAnchor};

pub const LEDGER_KEY: &str = "ledger";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub points: u32,
    pub completed_tasks: u32,
}

/// Derived score state for presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreState {
    pub daily_points: u32,
    pub total_points: u64,
    pub level: u64,
    pub progress_to_next_level: f64,
}

#[derive(Debug)]
pub struct ScoreLedger<S: KeyValueStore> {
    store: S,
    days: BTreeMap<NaiveDate, DayRecord>,
}

impl<S: KeyValueStore> ScoreLedger<S> {
    pub fn open(store: S) -> Result<Self> {
        let days = match load_json(&store, LEDGER_KEY)? {
            Loaded::Found(days) => days,
            Loaded::Missing => BTreeMap::new(),
            Loaded::Malformed(e) => {
                tracing::warn!(error = %e, "score ledger is malformed; starting empty");
                BTreeMap::new()
            }
        };
        Ok(Self { store, days })
    }

    pub fn get(&self, day: NaiveDate) -> Option<DayRecord> {
        self.days.get(&day).copied()
    }

    /// Store `score` as the record for `day`, replacing any earlier one.
    pub fn record(&mut self, day: NaiveDate, score: &DailyScore) -> Result<DayRecord> {
        let entry = DayRecord {
            points: score.total,
            completed_tasks: score.tasks_completed as u32,
        };
        let mut next = self.days.clone();
        next.insert(day, entry);
        save_json(&self.store, LEDGER_KEY, &next)?;
        self.days = next;
        Ok(entry)
    }

    pub fn total_points(&self) -> u64 {
        self.days.values().map(|r| r.points as u64).sum()
    }

    /// Days with at least one completed task.
    pub fn active_days(&self) -> impl Iterator<Item = &NaiveDate> {
        self.days
            .iter()
            .filter(|(_, r)| r.completed_tasks > 0)
            .map(|(d, _)| d)
    }

    /// Activity streak as of `today`.
    ///
    /// `completion_days` are the days tasks were actually finished on; they
    /// count whether or not the day was ever scored. For `today` they are
    /// authoritative, so a day whose tasks were all undone after it was
    /// recorded no longer counts.
    pub fn activity_streak<I>(&self, today: NaiveDate, completion_days: I, anchor: StreakAnchor) -> u32
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut days: BTreeSet<NaiveDate> = self.active_days().filter(|d| **d != today).copied().collect();
        days.extend(completion_days.into_iter().filter(|d| *d <= today));
        current_streak(&days, today, anchor)
    }

    pub fn level(&self) -> Level {
        resolve_level(self.total_points())
    }

    pub fn score_state(&self, day: NaiveDate) -> ScoreState {
        let level = self.level();
        ScoreState {
            daily_points: self.get(day).map(|r| r.points).unwrap_or(0),
            total_points: self.total_points(),
            level: level.level,
            progress_to_next_level: level.progress,
        }
    }
}
