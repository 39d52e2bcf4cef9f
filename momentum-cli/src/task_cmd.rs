use anyhow::{bail, Result};
use chrono::{Duration, Utc};
use clap::Subcommand;
use momentum_core::time::parse_local_to_utc;
use momentum_core::{category_icon, tasks_due_on, Task};
use serde::Serialize;

use crate::display::{short_id, tag_label};
use crate::state::Workspace;

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Schedule a task
    Add {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,

        /// Category (drives weighting and styling; default from config)
        #[arg(long)]
        category: Option<String>,

        /// Local start time "YYYY-MM-DD HH:MM" (default: now)
        #[arg(long)]
        start: Option<String>,

        /// Planned duration in minutes
        #[arg(long, default_value_t = 30)]
        duration: i32,
    },

    /// List tasks scheduled on a day
    List {
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Mark a task completed
    Done {
        /// Task id or unique id prefix
        id: String,

        /// Completed during a focus session (adds the session bonus)
        #[arg(long, default_value_t = false)]
        focused: bool,
    },

    /// Revert a completion made within the undo window
    Undo {
        /// Task id or unique id prefix
        id: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskView<'a> {
    #[serde(flatten)]
    task: &'a Task,
    icon: String,
    color: String,
}

pub fn run(cmd: TaskCommand) -> Result<()> {
    let ws = Workspace::open()?;
    let mut tasks = ws.load_tasks()?;

    match cmd {
        TaskCommand::Add {
            title,
            category,
            start,
            duration,
        } => {
            if duration <= 0 {
                bail!("--duration must be positive (got {duration})");
            }
            let title = title.join(" ");
            let title = title.trim();
            if title.is_empty() {
                bail!("task title is empty");
            }
            let category = category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| ws.config.tasks.default_category.clone());
            let start_time = match start {
                Some(s) => parse_local_to_utc(&s, ws.tz)?,
                None => Utc::now(),
            };

            let task = Task::new(uuid::Uuid::new_v4().to_string(), title, category, start_time)
                .with_duration(duration);
            let line = describe(&ws, &task);
            tasks.push(task);
            ws.save_tasks(&tasks)?;
            println!("Added {line}");
            Ok(())
        }

        TaskCommand::List { date, json } => {
            let day = ws.day_or_today(date.as_deref())?;
            let mut due = tasks_due_on(&tasks, day, ws.tz);
            due.sort_by_key(|t| t.start_time);

            if json {
                let views: Vec<TaskView> = due
                    .iter()
                    .map(|t| TaskView {
                        task: t,
                        icon: tag_label(category_icon(&t.category)),
                        color: tag_label(ws.config.scoring.category_colors.color(&t.category)),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&views)?);
                return Ok(());
            }

            if due.is_empty() {
                println!("No tasks on {day}.");
                return Ok(());
            }
            println!("Tasks on {day}:");
            for t in &due {
                println!("  {}", describe(&ws, t));
            }
            Ok(())
        }

        TaskCommand::Done { id, focused } => {
            let idx = resolve(&tasks, &id)?;
            tasks[idx].complete(Utc::now(), focused)?;
            ws.save_tasks(&tasks)?;
            println!("Completed {}", describe(&ws, &tasks[idx]));
            Ok(())
        }

        TaskCommand::Undo { id } => {
            let idx = resolve(&tasks, &id)?;
            let grace = Duration::seconds(ws.config.tasks.undo_grace_seconds.max(0));
            tasks[idx].undo_completion(Utc::now(), grace)?;
            ws.save_tasks(&tasks)?;
            println!("Reopened {}", describe(&ws, &tasks[idx]));
            Ok(())
        }
    }
}

fn describe(ws: &Workspace, t: &Task) -> String {
    let local = t.start_time.with_timezone(&ws.tz);
    format!(
        "[{}] {} {} | {} ({}/{}) {}m{} | id={}",
        if t.is_completed() { "x" } else { " " },
        local.format("%Y-%m-%d %H:%M"),
        t.title,
        t.category,
        tag_label(category_icon(&t.category)),
        tag_label(ws.config.scoring.category_colors.color(&t.category)),
        t.planned_duration,
        if t.focus_session { " focus" } else { "" },
        short_id(&t.id)
    )
}

/// Exact id, else a unique id prefix.
fn resolve(tasks: &[Task], reference: &str) -> Result<usize> {
    if let Some(i) = tasks.iter().position(|t| t.id == reference) {
        return Ok(i);
    }
    let matches: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| !reference.is_empty() && t.id.starts_with(reference))
        .map(|(i, _)| i)
        .collect();
    match matches.as_slice() {
        [i] => Ok(*i),
        [] => bail!("no task matches '{reference}' (see: momentum task list)"),
        _ => bail!("'{reference}' matches {} tasks; use more of the id", matches.len()),
    }
}
