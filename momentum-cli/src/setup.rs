use anyhow::{Context, Result};
use chrono::Utc;
use momentum_core::time::parse_timezone;
use momentum_core::{CompletionStore, Habit, HabitRecord, HabitRepository, StoreError, HABITS_KEY};
use std::io::{self, Write};

use crate::config::{config_path, load_config, save_config};
use crate::state::Workspace;

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

fn prompt_multiline(label: &str) -> Result<Vec<String>> {
    println!("{} (enter one per line; blank line to finish)", label);
    let mut out = Vec::new();
    loop {
        print!("> ");
        io::stdout().flush().ok();
        let mut s = String::new();
        // EOF ends the list like a blank line.
        if io::stdin().read_line(&mut s)? == 0 {
            break;
        }
        let s = s.trim().to_string();
        if s.is_empty() {
            break;
        }
        out.push(s);
    }
    Ok(out)
}

pub fn run_setup() -> Result<()> {
    println!("Momentum setup\n");

    let mut cfg = load_config()?;
    let tz = prompt(&format!("Timezone [{}]", cfg.timezone))?;
    if !tz.is_empty() {
        parse_timezone(&tz).with_context(|| format!("'{tz}' is not an IANA timezone"))?;
        cfg.timezone = tz;
    }
    save_config(&cfg)?;

    let names = prompt_multiline("Habits to track (leave empty for the defaults)")?;

    let ws = Workspace::open()?;
    let repo = HabitRepository::new(&ws.store);
    let added = if repo.load()?.is_none() && !names.is_empty() {
        let records = first_habits(&names);
        repo.save(&records)?;
        records.len()
    } else {
        let mut store = CompletionStore::open(&ws.store, ws.today(), ws.config.habits.streak_anchor)?;
        let mut added = 0;
        for name in &names {
            match store.add(name, Utc::now()) {
                Ok(_) => added += 1,
                Err(StoreError::DuplicateName(n)) => println!("  skipped '{n}' (already tracked)"),
                Err(e) => return Err(e.into()),
            }
        }
        added
    };

    println!("\nWrote:");
    println!("- {}", config_path()?.display());
    println!("- {} ({} new habit(s))", ws.store.path_for(HABITS_KEY).display(), added);

    println!("\nNext recommended steps:");
    println!("- momentum habit list");
    println!("- momentum task add \"Write design doc\" --category \"Deep Work\"");
    println!("- momentum health set --energy high --sleep good");
    println!("- momentum score");

    Ok(())
}

/// Records for a first-run habit list, skipping blanks and repeated names.
fn first_habits(names: &[String]) -> Vec<HabitRecord> {
    let now = Utc::now();
    let mut out: Vec<HabitRecord> = Vec::new();
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        if out.iter().any(|r| r.name.eq_ignore_ascii_case(name)) {
            continue;
        }
        out.push(Habit::new(uuid::Uuid::new_v4().to_string(), name, now).to_record());
    }
    out
}
