//! Habit model and its persisted record form.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::streak::{current_streak, longest_streak, StreakAnchor};
use crate::styling::{habit_style, ColorTag, IconTag, DEFAULT_HABIT_STYLE};

/// Names seeded on first run (or when the stored document is unreadable).
pub const DEFAULT_HABITS: [&str; 4] = ["Drink Water", "Exercise", "Read", "Meditate"];

/// A recurring activity tracked by per-day completion marks.
///
/// `icon`, `color` and `streak` are derived; they are refreshed whenever the
/// habit is built or toggled and cannot be set independently.
#[derive(Debug, Clone, PartialEq)]
pub struct Habit {
    id: String,
    name: String,
    icon: IconTag,
    color: ColorTag,
    completed_dates: BTreeSet<NaiveDate>,
    created_at: DateTime<Utc>,
    streak: u32,
}

impl Habit {
    pub fn new(id: impl Into<String>, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        let name = name.into();
        let style = habit_style(&name);
        Self {
            id: id.into(),
            name,
            icon: style.icon,
            color: style.color,
            completed_dates: BTreeSet::new(),
            created_at,
            streak: 0,
        }
    }

    /// Rebuild from a stored record. Style is re-derived from the name and the
    /// streak recomputed; the stored values for both are ignored.
    pub fn from_record(record: HabitRecord, today: NaiveDate, anchor: StreakAnchor) -> Self {
        let mut habit = Habit::new(record.id, record.name, record.created_at);
        habit.completed_dates = record.completed_dates.into_iter().collect();
        habit.refresh_streak(today, anchor);
        habit
    }

    pub fn to_record(&self) -> HabitRecord {
        HabitRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            streak: self.streak,
            color: self.color,
            icon: self.icon,
            completed_dates: self.completed_dates.iter().copied().collect(),
            created_at: self.created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon(&self) -> IconTag {
        self.icon
    }

    pub fn color(&self) -> ColorTag {
        self.color
    }

    pub fn completed_dates(&self) -> &BTreeSet<NaiveDate> {
        &self.completed_dates
    }

    pub fn is_completed_on(&self, day: NaiveDate) -> bool {
        self.completed_dates.contains(&day)
    }

    /// Streak as of the last toggle or refresh.
    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn longest_streak(&self) -> u32 {
        longest_streak(&self.completed_dates)
    }

    /// Flip membership of `day`. Returns true if the day is now completed.
    pub fn toggle(&mut self, day: NaiveDate, today: NaiveDate, anchor: StreakAnchor) -> bool {
        let completed = if self.completed_dates.remove(&day) {
            false
        } else {
            self.completed_dates.insert(day);
            true
        };
        self.refresh_streak(today, anchor);
        completed
    }

    pub fn refresh_streak(&mut self, today: NaiveDate, anchor: StreakAnchor) {
        self.streak = current_streak(&self.completed_dates, today, anchor);
    }
}

/// On-disk shape of a habit.
///
/// `color`, `icon` and `streak` are written for other readers of the document
/// but never trusted on load: style is re-derived from `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub streak: u32,
    #[serde(skip_deserializing, default = "default_color")]
    pub color: ColorTag,
    #[serde(skip_deserializing, default = "default_icon")]
    pub icon: IconTag,
    #[serde(default)]
    pub completed_dates: Vec<NaiveDate>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

fn default_color() -> ColorTag {
    DEFAULT_HABIT_STYLE.color
}

fn default_icon() -> IconTag {
    DEFAULT_HABIT_STYLE.icon
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn style_is_derived_from_name() {
        let h = Habit::new("h1", "Drink Water", created());
        assert_eq!(h.icon(), IconTag::Droplet);
        assert_eq!(h.color(), ColorTag::Blue);
    }

    #[test]
    fn toggle_flips_membership_and_updates_streak() {
        let today = d(2026, 3, 10);
        let mut h = Habit::new("h1", "Exercise", created());

        assert!(h.toggle(today, today, StreakAnchor::Today));
        assert_eq!(h.streak(), 1);

        assert!(!h.toggle(today, today, StreakAnchor::Today));
        assert_eq!(h.streak(), 0);
        assert!(h.completed_dates().is_empty());
    }

    #[test]
    fn from_record_ignores_stored_style_and_streak() {
        let today = d(2026, 3, 10);
        let record = HabitRecord {
            id: "h1".to_string(),
            name: "Read".to_string(),
            streak: 99,
            color: ColorTag::Red,
            icon: IconTag::Moon,
            completed_dates: vec![d(2026, 3, 10), d(2026, 3, 9), d(2026, 3, 9)],
            created_at: created(),
        };

        let h = Habit::from_record(record, today, StreakAnchor::Today);
        assert_eq!(h.icon(), IconTag::Book);
        assert_eq!(h.color(), ColorTag::Amber);
        assert_eq!(h.streak(), 2);
        assert_eq!(h.completed_dates().len(), 2);
    }

    #[test]
    fn record_uses_camel_case_keys() {
        let mut h = Habit::new("h1", "Meditate", created());
        h.toggle(d(2026, 3, 10), d(2026, 3, 10), StreakAnchor::Today);

        let json = serde_json::to_value(h.to_record()).unwrap();
        assert_eq!(json["completedDates"][0], "2026-03-10");
        assert_eq!(json["icon"], "brain");
        assert_eq!(json["streak"], 1);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn record_without_style_fields_still_loads() {
        let json = r#"{"id":"h1","name":"Exercise","completedDates":["2026-03-09","2026-03-10"]}"#;
        let record: HabitRecord = serde_json::from_str(json).unwrap();
        let h = Habit::from_record(record, d(2026, 3, 10), StreakAnchor::Today);
        assert_eq!(h.icon(), IconTag::Dumbbell);
        assert_eq!(h.streak(), 2);
    }

    #[test]
    fn unknown_style_tags_are_ignored() {
        let json = r#"{"id":"h1","name":"Read","icon":"sparkles","color":"neon",
            "completedDates":[],"createdAt":"2026-03-01T08:00:00Z"}"#;
        let record: HabitRecord = serde_json::from_str(json).unwrap();
        assert_eq!(Habit::from_record(record, d(2026, 3, 10), StreakAnchor::Today).icon(), IconTag::Book);
    }
}
