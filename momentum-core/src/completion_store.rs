//! Completion store: the habit collection and its per-day completion marks.
//!
//! Every mutation is write-through. The change is applied to a copy of the
//! collection, the copy is persisted, and only then does it replace the
//! in-memory state. A failed save leaves both sides as they were.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{Result, StoreError};
use crate::habit::{Habit, HabitRecord, DEFAULT_HABITS};
use crate::kv::{load_json, save_json, KeyValueStore, Loaded};
use crate::streak::StreakAnchor;

pub const HABITS_KEY: &str = "habits";
/// Copy of a habit document that could not be fully read, kept before it is rewritten.
pub const HABITS_BACKUP_KEY: &str = "habits.bak";

/// Typed access to the habit document.
#[derive(Debug, Clone)]
pub struct HabitRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> HabitRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// `None` when the document is missing or not a list at all.
    ///
    /// Records are decoded one at a time; an unreadable record is skipped
    /// with a warning instead of discarding the whole collection. Whenever
    /// anything is dropped, the raw document is first copied to
    /// [`HABITS_BACKUP_KEY`].
    pub fn load(&self) -> Result<Option<Vec<HabitRecord>>> {
        let values: Vec<serde_json::Value> = match load_json(&self.store, HABITS_KEY)? {
            Loaded::Found(values) => values,
            Loaded::Missing => return Ok(None),
            Loaded::Malformed(e) => {
                tracing::warn!(error = %e, "habit document is malformed; ignoring it");
                self.back_up()?;
                return Ok(None);
            }
        };

        let total = values.len();
        let mut records = Vec::with_capacity(total);
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<HabitRecord>(value) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(index, error = %e, "skipping unreadable habit record"),
            }
        }
        if records.len() < total {
            self.back_up()?;
        }
        Ok(Some(records))
    }

    fn back_up(&self) -> Result<()> {
        if let Some(raw) = self.store.get(HABITS_KEY)? {
            self.store.put(HABITS_BACKUP_KEY, &raw)?;
            tracing::warn!(key = HABITS_BACKUP_KEY, "kept a copy of the unreadable habit document");
        }
        Ok(())
    }

    pub fn save(&self, records: &[HabitRecord]) -> Result<()> {
        save_json(&self.store, HABITS_KEY, records)
    }
}

#[derive(Debug)]
pub struct CompletionStore<S: KeyValueStore> {
    repo: HabitRepository<S>,
    habits: Vec<Habit>,
    today: NaiveDate,
    anchor: StreakAnchor,
}

impl<S: KeyValueStore> CompletionStore<S> {
    /// Load habits from `store`, seeding the defaults when nothing usable is stored.
    pub fn open(store: S, today: NaiveDate, anchor: StreakAnchor) -> Result<Self> {
        let repo = HabitRepository::new(store);

        let habits = match repo.load()? {
            Some(records) => records
                .into_iter()
                .map(|r| Habit::from_record(r, today, anchor))
                .collect(),
            None => {
                let seeded = default_habits(Utc::now());
                let records: Vec<HabitRecord> = seeded.iter().map(Habit::to_record).collect();
                match repo.save(&records) {
                    Ok(()) => tracing::info!(count = seeded.len(), "seeded default habits"),
                    Err(e) => tracing::warn!(error = %e, "could not persist default habits"),
                }
                seeded
            }
        };

        Ok(Self {
            repo,
            habits,
            today,
            anchor,
        })
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id() == id)
    }

    /// Resolve a user-supplied reference: exact id, then unique id prefix, then
    /// case-insensitive name.
    pub fn find(&self, reference: &str) -> Option<&Habit> {
        if let Some(h) = self.get(reference) {
            return Some(h);
        }

        let mut by_prefix = self.habits.iter().filter(|h| h.id().starts_with(reference));
        if let (Some(h), None) = (by_prefix.next(), by_prefix.next()) {
            if !reference.is_empty() {
                return Some(h);
            }
        }

        self.habits
            .iter()
            .find(|h| h.name().eq_ignore_ascii_case(reference.trim()))
    }

    /// Move the reference day forward (e.g. after midnight) and recompute streaks.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
        for h in &mut self.habits {
            h.refresh_streak(today, self.anchor);
        }
    }

    pub fn add(&mut self, name: &str, now: DateTime<Utc>) -> Result<Habit> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if self.habits.iter().any(|h| h.name().eq_ignore_ascii_case(name)) {
            return Err(StoreError::DuplicateName(name.to_string()));
        }

        let habit = Habit::new(uuid::Uuid::new_v4().to_string(), name, now);
        let mut next = self.habits.clone();
        next.push(habit.clone());
        self.commit(next)?;

        tracing::info!(id = habit.id(), name = habit.name(), "added habit");
        Ok(habit)
    }

    /// Flip completion of `day` for the habit and return the updated habit.
    pub fn toggle(&mut self, id: &str, day: NaiveDate) -> Result<Habit> {
        let idx = self.index_of(id)?;

        let mut next = self.habits.clone();
        next[idx].toggle(day, self.today, self.anchor);
        let updated = next[idx].clone();
        self.commit(next)?;

        Ok(updated)
    }

    /// Remove the habit and all of its history.
    pub fn delete(&mut self, id: &str) -> Result<Habit> {
        let idx = self.index_of(id)?;

        let mut next = self.habits.clone();
        let removed = next.remove(idx);
        self.commit(next)?;

        tracing::info!(id = removed.id(), name = removed.name(), "deleted habit");
        Ok(removed)
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.habits
            .iter()
            .position(|h| h.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn commit(&mut self, next: Vec<Habit>) -> Result<()> {
        let records: Vec<HabitRecord> = next.iter().map(Habit::to_record).collect();
        self.repo.save(&records)?;
        self.habits = next;
        Ok(())
    }
}

pub fn default_habits(now: DateTime<Utc>) -> Vec<Habit> {
    DEFAULT_HABITS
        .iter()
        .map(|name| Habit::new(uuid::Uuid::new_v4().to_string(), *name, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use std::cell::Cell;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Accepts reads, rejects writes while `fail` is set.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail: Cell<bool>,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn put(&self, key: &str, value: &str) -> Result<()> {
            if self.fail.get() {
                return Err(StoreError::WriteRejected {
                    key: key.to_string(),
                    reason: "quota exceeded".to_string(),
                });
            }
            self.inner.put(key, value)
        }
    }

    #[test]
    fn first_open_seeds_and_persists_defaults() {
        let kv = MemoryStore::new();
        let store = CompletionStore::open(&kv, d(2026, 3, 10), StreakAnchor::Today).unwrap();

        let names: Vec<&str> = store.habits().iter().map(|h| h.name()).collect();
        assert_eq!(names, DEFAULT_HABITS.to_vec());
        assert!(kv.raw(HABITS_KEY).is_some());
    }

    #[test]
    fn malformed_document_falls_back_to_defaults() {
        let kv = MemoryStore::new().with_entry(HABITS_KEY, "{\"oops\": true}");
        let store = CompletionStore::open(&kv, d(2026, 3, 10), StreakAnchor::Today).unwrap();
        assert_eq!(store.habits().len(), DEFAULT_HABITS.len());
        assert_eq!(kv.raw(HABITS_BACKUP_KEY).as_deref(), Some("{\"oops\": true}"));
    }

    #[test]
    fn record_without_style_keeps_its_history() {
        let doc = r#"[{"id":"h1","name":"Exercise","completedDates":["2026-03-09","2026-03-10"],
            "createdAt":"2026-03-01T08:00:00Z"}]"#;
        let kv = MemoryStore::new().with_entry(HABITS_KEY, doc);
        let today = d(2026, 3, 10);
        let mut store = CompletionStore::open(&kv, today, StreakAnchor::Today).unwrap();

        assert_eq!(store.habits().len(), 1);
        let h = store.get("h1").unwrap();
        assert_eq!(h.streak(), 2);
        assert!(kv.raw(HABITS_BACKUP_KEY).is_none());

        // The next write keeps the history and fills in the derived style.
        store.toggle("h1", d(2026, 3, 8)).unwrap();
        let saved = kv.raw(HABITS_KEY).unwrap();
        assert!(saved.contains("2026-03-09"));
        assert!(saved.contains("\"icon\": \"dumbbell\""));
    }

    #[test]
    fn one_bad_record_is_skipped_not_the_collection() {
        let doc = r#"[
            {"id":"h1","name":"Read","completedDates":["2026-03-10"]},
            {"id":"h2","completedDates":"not a list"},
            {"id":"h3","name":"Meditate"}
        ]"#;
        let kv = MemoryStore::new().with_entry(HABITS_KEY, doc);
        let store = CompletionStore::open(&kv, d(2026, 3, 10), StreakAnchor::Today).unwrap();

        let ids: Vec<&str> = store.habits().iter().map(|h| h.id()).collect();
        assert_eq!(ids, vec!["h1", "h3"]);
        assert_eq!(kv.raw(HABITS_BACKUP_KEY).as_deref(), Some(doc));
        // Nothing was seeded over the user's document.
        assert_eq!(kv.raw(HABITS_KEY).as_deref(), Some(doc));
    }

    #[test]
    fn reopen_restores_marks_and_recomputes_streaks() {
        let kv = MemoryStore::new();
        let today = d(2026, 3, 10);
        let id = {
            let mut store = CompletionStore::open(&kv, today, StreakAnchor::Today).unwrap();
            let id = store.find("exercise").unwrap().id().to_string();
            store.toggle(&id, today).unwrap();
            store.toggle(&id, d(2026, 3, 9)).unwrap();
            id
        };

        let reopened = CompletionStore::open(&kv, today, StreakAnchor::Today).unwrap();
        assert_eq!(reopened.get(&id).unwrap().streak(), 2);

        // A day later without a new mark, the strict anchor drops to 0.
        let tomorrow = CompletionStore::open(&kv, d(2026, 3, 11), StreakAnchor::Today).unwrap();
        assert_eq!(tomorrow.get(&id).unwrap().streak(), 0);
    }

    #[test]
    fn double_toggle_is_self_inverse() {
        let kv = MemoryStore::new();
        let today = d(2026, 3, 10);
        let mut store = CompletionStore::open(&kv, today, StreakAnchor::Today).unwrap();
        let id = store.habits()[0].id().to_string();
        store.toggle(&id, d(2026, 3, 8)).unwrap();
        let before = store.get(&id).unwrap().completed_dates().clone();

        store.toggle(&id, today).unwrap();
        store.toggle(&id, today).unwrap();

        assert_eq!(store.get(&id).unwrap().completed_dates(), &before);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let kv = MemoryStore::new();
        let mut store = CompletionStore::open(&kv, d(2026, 3, 10), StreakAnchor::Today).unwrap();
        assert!(matches!(store.toggle("nope", d(2026, 3, 10)), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete("nope"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn add_validates_names() {
        let kv = MemoryStore::new();
        let mut store = CompletionStore::open(&kv, d(2026, 3, 10), StreakAnchor::Today).unwrap();

        assert!(matches!(store.add("   ", Utc::now()), Err(StoreError::EmptyName)));
        assert!(matches!(store.add("exercise", Utc::now()), Err(StoreError::DuplicateName(_))));

        let h = store.add("  Journal  ", Utc::now()).unwrap();
        assert_eq!(h.name(), "Journal");
        assert_eq!(store.habits().len(), DEFAULT_HABITS.len() + 1);
    }

    #[test]
    fn delete_is_permanent() {
        let kv = MemoryStore::new();
        let today = d(2026, 3, 10);
        let mut store = CompletionStore::open(&kv, today, StreakAnchor::Today).unwrap();
        let id = store.habits()[1].id().to_string();
        store.toggle(&id, today).unwrap();
        store.delete(&id).unwrap();

        let reopened = CompletionStore::open(&kv, today, StreakAnchor::Today).unwrap();
        assert!(reopened.get(&id).is_none());
        assert_eq!(reopened.habits().len(), DEFAULT_HABITS.len() - 1);
    }

    #[test]
    fn failed_write_leaves_memory_and_disk_unchanged() {
        let kv = FlakyStore::default();
        let today = d(2026, 3, 10);
        let mut store = CompletionStore::open(&kv, today, StreakAnchor::Today).unwrap();
        let id = store.habits()[0].id().to_string();
        let on_disk = kv.inner.raw(HABITS_KEY);

        kv.fail.set(true);
        let err = store.toggle(&id, today).unwrap_err();
        assert!(matches!(err, StoreError::WriteRejected { .. }));
        assert!(!store.get(&id).unwrap().is_completed_on(today));
        assert_eq!(kv.inner.raw(HABITS_KEY), on_disk);

        assert!(store.add("Journal", Utc::now()).is_err());
        assert!(store.delete(&id).is_err());
        assert_eq!(store.habits().len(), DEFAULT_HABITS.len());

        kv.fail.set(false);
        assert!(store.toggle(&id, today).unwrap().is_completed_on(today));
    }

    #[test]
    fn failed_seed_write_is_not_fatal() {
        let kv = FlakyStore::default();
        kv.fail.set(true);
        let store = CompletionStore::open(&kv, d(2026, 3, 10), StreakAnchor::Today).unwrap();
        assert_eq!(store.habits().len(), DEFAULT_HABITS.len());
        assert!(kv.inner.raw(HABITS_KEY).is_none());
    }

    #[test]
    fn find_by_prefix_and_name() {
        let kv = MemoryStore::new();
        let store = CompletionStore::open(&kv, d(2026, 3, 10), StreakAnchor::Today).unwrap();
        let read = store.find("READ").unwrap();
        let prefix = &read.id()[..8];
        assert_eq!(store.find(prefix).unwrap().id(), read.id());
        assert!(store.find("").is_none());
        assert!(store.find("no such habit").is_none());
    }

    #[test]
    fn rolling_today_forward_recomputes_streaks() {
        let kv = MemoryStore::new();
        let today = d(2026, 3, 10);
        let mut store = CompletionStore::open(&kv, today, StreakAnchor::TodayOrYesterday).unwrap();
        let id = store.habits()[0].id().to_string();
        store.toggle(&id, today).unwrap();

        store.set_today(d(2026, 3, 11));
        assert_eq!(store.get(&id).unwrap().streak(), 1);
        store.set_today(d(2026, 3, 12));
        assert_eq!(store.get(&id).unwrap().streak(), 0);
    }
}
