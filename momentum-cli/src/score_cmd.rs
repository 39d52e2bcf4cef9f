use anyhow::{Context, Result};
use chrono::NaiveDate;
use momentum_core::{
    completion_days, resolve_level, score_day, DailyScore, ScoreLedger, ScoreState, StreakContext,
};
use serde::Serialize;

use crate::display::percent;
use crate::state::Workspace;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreReport {
    date: NaiveDate,
    recorded: bool,
    activity_streak: u32,
    score: DailyScore,
    state: ScoreState,
}

/// Score `date` (default today) and record it in the ledger unless `dry_run`.
pub fn run_score(date: Option<String>, json: bool, dry_run: bool) -> Result<()> {
    let ws = Workspace::open()?;
    let day = ws.day_or_today(date.as_deref())?;
    let tasks = ws.load_tasks()?;
    let health = ws.load_health()?;
    let mut ledger = ScoreLedger::open(&ws.store).context("open score ledger")?;

    let activity_streak = ledger.activity_streak(
        day,
        completion_days(&tasks, ws.tz),
        ws.config.habits.streak_anchor,
    );

    let score = score_day(
        &tasks,
        day,
        ws.tz,
        &health,
        StreakContext { activity_streak },
        &ws.config.scoring,
    );
    tracing::debug!(%day, due = score.tasks_due, finished = score.tasks_completed, total = score.total, "scored day");

    let state = if dry_run {
        let previous = ledger.get(day).map(|r| r.points as u64).unwrap_or(0);
        let total_points = ledger.total_points() - previous + score.total as u64;
        let level = resolve_level(total_points);
        ScoreState {
            daily_points: score.total,
            total_points,
            level: level.level,
            progress_to_next_level: level.progress,
        }
    } else {
        ledger.record(day, &score)?;
        ledger.score_state(day)
    };

    let report = ScoreReport {
        date: day,
        recorded: !dry_run,
        activity_streak,
        score,
        state,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let s = &report.score;
    println!("{}{}", report.date, if dry_run { " (dry run)" } else { "" });
    println!(
        "  scheduled:  {}/{} completed ({:.0}%)",
        s.tasks_due_completed, s.tasks_due, s.completion_rate
    );
    println!("  finished:   {} task(s)", s.tasks_completed);
    if s.raw_task_points > s.task_points {
        println!("  task pts:   {} (capped from {})", s.task_points, s.raw_task_points);
    } else {
        println!("  task pts:   {}", s.task_points);
    }
    println!("  streak:     {} day(s), +{}", report.activity_streak, s.streak_bonus);
    println!("  completion: +{}", s.completion_bonus);
    println!("  day total:  {}", s.total);
    println!(
        "  all time:   {} pts | level {} ({} to next)",
        report.state.total_points,
        report.state.level,
        percent(report.state.progress_to_next_level)
    );
    Ok(())
}

pub fn run_level(points: u64) -> Result<()> {
    let l = resolve_level(points);
    println!("level {} ({})", l.level, percent(l.progress));
    Ok(())
}
