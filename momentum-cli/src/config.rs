use anyhow::{Context, Result};
use clap::Subcommand;
use momentum_core::{ScoringPolicy, StreakAnchor, DEFAULT_RETENTION_DAYS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_momentum_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// IANA timezone that defines calendar days.
    pub timezone: String,
    pub habits: HabitsSection,
    pub tasks: TasksSection,
    pub mood: MoodSection,
    pub scoring: ScoringPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitsSection {
    pub streak_anchor: StreakAnchor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TasksSection {
    /// How long a completion can still be undone.
    pub undo_grace_seconds: i64,
    pub default_category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodSection {
    pub retention_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: "America/Chicago".to_string(),
            habits: HabitsSection::default(),
            tasks: TasksSection::default(),
            mood: MoodSection::default(),
            scoring: ScoringPolicy::default(),
        }
    }
}

impl Default for HabitsSection {
    fn default() -> Self {
        Self {
            streak_anchor: StreakAnchor::Today,
        }
    }
}

impl Default for TasksSection {
    fn default() -> Self {
        Self {
            undo_grace_seconds: 30,
            default_category: "General".to_string(),
        }
    }
}

impl Default for MoodSection {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a default config.toml (no-op if one exists)
    Init,
    /// Print the effective configuration
    Show,
    /// Print the config.toml location
    Path,
}

pub fn run(cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Init => init_config(),
        ConfigCommand::Show => {
            let cfg = load_config()?;
            print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            Ok(())
        }
        ConfigCommand::Path => {
            println!("{}", config_path()?.display());
            Ok(())
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_momentum_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
