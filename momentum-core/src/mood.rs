//! Mood log: append-only `{date, mood}` entries with a rolling retention window.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::kv::{load_json, save_json, KeyValueStore, Loaded};

pub const MOODS_KEY: &str = "moods";
pub const DEFAULT_RETENTION_DAYS: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Low,
    Bad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub date: NaiveDate,
    pub mood: Mood,
}

#[derive(Debug)]
pub struct MoodLog<S: KeyValueStore> {
    store: S,
    entries: Vec<MoodEntry>,
    retention_days: u32,
}

impl<S: KeyValueStore> MoodLog<S> {
    pub fn open(store: S, retention_days: u32) -> Result<Self> {
        let entries = match load_json(&store, MOODS_KEY)? {
            Loaded::Found(entries) => entries,
            Loaded::Missing => Vec::new(),
            Loaded::Malformed(e) => {
                tracing::warn!(error = %e, "mood log is malformed; starting empty");
                Vec::new()
            }
        };
        Ok(Self {
            store,
            entries,
            retention_days: retention_days.max(1),
        })
    }

    pub fn entries(&self) -> &[MoodEntry] {
        &self.entries
    }

    /// Append an entry, then drop everything outside the window ending `today`.
    pub fn append(&mut self, entry: MoodEntry, today: NaiveDate) -> Result<()> {
        let mut next = self.entries.clone();
        next.push(entry);

        let cutoff = self.cutoff(today);
        let before = next.len();
        next.retain(|e| e.date > cutoff);
        if next.len() < before {
            tracing::debug!(pruned = before - next.len(), %cutoff, "pruned mood entries");
        }

        save_json(&self.store, MOODS_KEY, &next)?;
        self.entries = next;
        Ok(())
    }

    /// Most recent entry for `day`, if any.
    pub fn on(&self, day: NaiveDate) -> Option<Mood> {
        self.entries.iter().rev().find(|e| e.date == day).map(|e| e.mood)
    }

    // Entries on or before this date fall outside the window.
    fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(self.retention_days as u64))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "great" => Ok(Mood::Great),
            "good" => Ok(Mood::Good),
            "okay" | "ok" => Ok(Mood::Okay),
            "low" => Ok(Mood::Low),
            "bad" => Ok(Mood::Bad),
            other => Err(format!("unknown mood '{other}' (great|good|okay|low|bad)")),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mood::Great => "great",
            Mood::Good => "good",
            Mood::Okay => "okay",
            Mood::Low => "low",
            Mood::Bad => "bad",
        };
        f.write_str(s)
    }
}
