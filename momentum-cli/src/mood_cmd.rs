use anyhow::{Context, Result};
use clap::Subcommand;
use momentum_core::{Mood, MoodEntry, MoodLog};

use crate::state::Workspace;

#[derive(Subcommand, Debug)]
pub enum MoodCommand {
    /// Record a mood (great | good | okay | low | bad)
    Log {
        mood: Mood,

        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show the retained mood history, oldest first
    List {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

pub fn run(cmd: MoodCommand) -> Result<()> {
    let ws = Workspace::open()?;
    let today = ws.today();
    let mut log = MoodLog::open(&ws.store, ws.config.mood.retention_days).context("open mood log")?;

    match cmd {
        MoodCommand::Log { mood, date } => {
            let date = ws.day_or_today(date.as_deref())?;
            log.append(MoodEntry { date, mood }, today)?;
            if log.on(date).is_none() {
                println!(
                    "{date} is older than the {}-day window; entry was not kept",
                    ws.config.mood.retention_days
                );
            } else {
                println!("{date}: {mood}");
            }
            Ok(())
        }

        MoodCommand::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(log.entries())?);
                return Ok(());
            }
            if log.entries().is_empty() {
                println!("No moods logged.");
            }
            for e in log.entries() {
                println!("{}  {}", e.date, e.mood);
            }
            Ok(())
        }
    }
}
