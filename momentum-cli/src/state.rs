use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use momentum_core::kv::{load_json, save_json, Loaded};
use momentum_core::time::{parse_day, parse_timezone, today_in};
use momentum_core::{FileStore, HealthSnapshot, Task};
use std::fs;
use std::path::PathBuf;

use crate::config::{load_config, Config};

pub const TASKS_KEY: &str = "tasks";
pub const HEALTH_KEY: &str = "health";

/// `$MOMENTUM_HOME`, or `~/.momentum`.
pub fn momentum_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("MOMENTUM_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set (or set MOMENTUM_HOME)")?;
    Ok(PathBuf::from(home).join(".momentum"))
}

pub fn ensure_momentum_home() -> Result<PathBuf> {
    let dir = momentum_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn data_dir() -> Result<PathBuf> {
    Ok(ensure_momentum_home()?.join("data"))
}

/// Everything a command needs: config, timezone, and the document store.
pub struct Workspace {
    pub config: Config,
    pub tz: Tz,
    pub store: FileStore,
}

impl Workspace {
    pub fn open() -> Result<Self> {
        let config = load_config()?;
        let tz = parse_timezone(&config.timezone)
            .with_context(|| format!("config.toml timezone = {:?}", config.timezone))?;
        let dir = data_dir()?;
        let store = FileStore::open(&dir).with_context(|| format!("open {}", dir.display()))?;
        Ok(Self { config, tz, store })
    }

    pub fn today(&self) -> NaiveDate {
        today_in(self.tz)
    }

    /// `--date` if given, else today.
    pub fn day_or_today(&self, date: Option<&str>) -> Result<NaiveDate> {
        match date {
            Some(s) => parse_day(s),
            None => Ok(self.today()),
        }
    }

    pub fn load_tasks(&self) -> Result<Vec<Task>> {
        match load_json(&self.store, TASKS_KEY)? {
            Loaded::Found(tasks) => Ok(tasks),
            Loaded::Missing => Ok(Vec::new()),
            Loaded::Malformed(e) => {
                anyhow::bail!("{} is not a valid task list: {e}", self.store.path_for(TASKS_KEY).display())
            }
        }
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        save_json(&self.store, TASKS_KEY, tasks)?;
        Ok(())
    }

    /// Stored snapshot, or the neutral default.
    pub fn load_health(&self) -> Result<HealthSnapshot> {
        match load_json(&self.store, HEALTH_KEY)? {
            Loaded::Found(h) => Ok(h),
            Loaded::Missing => Ok(HealthSnapshot::default()),
            Loaded::Malformed(e) => {
                tracing::warn!(error = %e, "health snapshot is malformed; using defaults");
                Ok(HealthSnapshot::default())
            }
        }
    }

    pub fn save_health(&self, health: &HealthSnapshot) -> Result<()> {
        save_json(&self.store, HEALTH_KEY, health)?;
        Ok(())
    }
}
