use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use momentum_core::{ColorTag, CompletionStore, FileStore, Habit, IconTag};
use serde::Serialize;

use crate::display::{short_id, tag_label};
use crate::state::Workspace;

#[derive(Subcommand, Debug)]
pub enum HabitCommand {
    /// List habits with their current streaks
    List {
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Add a habit (icon and color are derived from the name)
    Add {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Mark a habit done for a day, or undo the mark if it is already done
    Toggle {
        /// Habit id, id prefix, or name
        habit: String,

        /// Day to toggle (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a habit and its entire history
    Delete {
        /// Habit id, id prefix, or name
        habit: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HabitView {
    id: String,
    name: String,
    icon: IconTag,
    color: ColorTag,
    streak: u32,
    longest_streak: u32,
    done_today: bool,
    completed_dates: Vec<NaiveDate>,
}

impl HabitView {
    fn new(h: &Habit, today: NaiveDate) -> Self {
        Self {
            id: h.id().to_string(),
            name: h.name().to_string(),
            icon: h.icon(),
            color: h.color(),
            streak: h.streak(),
            longest_streak: h.longest_streak(),
            done_today: h.is_completed_on(today),
            completed_dates: h.completed_dates().iter().copied().collect(),
        }
    }
}

pub fn run(cmd: HabitCommand) -> Result<()> {
    let ws = Workspace::open()?;
    let today = ws.today();
    let mut store = CompletionStore::open(&ws.store, today, ws.config.habits.streak_anchor)
        .context("open habit store")?;

    match cmd {
        HabitCommand::List { json } => list(&store, today, json),
        HabitCommand::Add { name } => {
            let h = store.add(&name.join(" "), Utc::now())?;
            println!(
                "Added {} ({}/{}) id={}",
                h.name(),
                tag_label(h.icon()),
                tag_label(h.color()),
                short_id(h.id())
            );
            Ok(())
        }
        HabitCommand::Toggle { habit, date } => {
            let day = ws.day_or_today(date.as_deref())?;
            let id = resolve(&store, &habit)?;
            let h = store.toggle(&id, day)?;
            let state = if h.is_completed_on(day) { "done" } else { "not done" };
            println!("{}: {} on {} | streak={}", h.name(), state, day, h.streak());
            Ok(())
        }
        HabitCommand::Delete { habit } => {
            let id = resolve(&store, &habit)?;
            let h = store.delete(&id)?;
            println!("Deleted {} ({} completion marks)", h.name(), h.completed_dates().len());
            Ok(())
        }
    }
}

fn list(store: &CompletionStore<&FileStore>, today: NaiveDate, json: bool) -> Result<()> {
    let views: Vec<HabitView> = store.habits().iter().map(|h| HabitView::new(h, today)).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    if views.is_empty() {
        println!("No habits. Add one: momentum habit add <name>");
        return Ok(());
    }

    for v in &views {
        println!(
            "[{}] {:<24} streak={:<3} best={:<3} {}/{} id={}",
            if v.done_today { "x" } else { " " },
            v.name,
            v.streak,
            v.longest_streak,
            tag_label(v.icon),
            tag_label(v.color),
            short_id(&v.id)
        );
    }
    Ok(())
}

fn resolve(store: &CompletionStore<&FileStore>, reference: &str) -> Result<String> {
    store
        .find(reference)
        .map(|h| h.id().to_string())
        .with_context(|| format!("no habit matches '{reference}' (see: momentum habit list)"))
}
