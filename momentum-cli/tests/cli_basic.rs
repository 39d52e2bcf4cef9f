use std::path::Path;
use std::process::{Command, Output};

fn momentum(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_momentum"))
        .args(args)
        .env("MOMENTUM_HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("run momentum")
}

fn ok(home: &Path, args: &[&str]) -> String {
    let out = momentum(home, args);
    assert!(
        out.status.success(),
        "momentum {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout).unwrap()
}

fn json(home: &Path, args: &[&str]) -> serde_json::Value {
    serde_json::from_str(&ok(home, args)).unwrap()
}

#[test]
fn first_run_seeds_default_habits() {
    let home = tempfile::tempdir().unwrap();
    let habits = json(home.path(), &["habit", "list", "--json"]);
    let names: Vec<&str> = habits
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Drink Water", "Exercise", "Read", "Meditate"]);
    assert_eq!(habits[0]["icon"], "droplet");
    assert!(home.path().join("data").join("habits.json").exists());
}

#[test]
fn toggle_today_twice_resets_streak() {
    let home = tempfile::tempdir().unwrap();
    ok(home.path(), &["habit", "add", "Evening", "walk"]);

    let out = ok(home.path(), &["habit", "toggle", "evening walk"]);
    assert!(out.contains("streak=1"), "{out}");
    let out = ok(home.path(), &["habit", "toggle", "Evening walk"]);
    assert!(out.contains("streak=0"), "{out}");

    let habits = json(home.path(), &["habit", "list", "--json"]);
    let walk = habits
        .as_array()
        .unwrap()
        .iter()
        .find(|h| h["name"] == "Evening walk")
        .unwrap();
    assert_eq!(walk["completedDates"].as_array().unwrap().len(), 0);
}

#[test]
fn toggling_an_unknown_habit_fails() {
    let home = tempfile::tempdir().unwrap();
    let out = momentum(home.path(), &["habit", "toggle", "Juggle"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no habit matches"));
}

#[test]
fn deep_work_on_a_good_day_scores_and_records() {
    let home = tempfile::tempdir().unwrap();
    let h = home.path();
    ok(h, &["health", "set", "--energy", "high", "--sleep", "good"]);
    ok(h, &["task", "add", "Design", "doc", "--category", "Deep Work"]);

    let tasks = json(h, &["task", "list", "--json"]);
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["color"], "purple");
    let id = tasks[0]["id"].as_str().unwrap().to_string();
    ok(h, &["task", "done", &id[..8]]);

    let report = json(h, &["score", "--json"]);
    // 10 * 2.0 * 1.1 * 1.1 = 24.2 -> 25; full completion adds 50.
    assert_eq!(report["score"]["taskPoints"], 25);
    assert_eq!(report["score"]["completionBonus"], 50);
    assert_eq!(report["score"]["total"], 75);
    assert_eq!(report["state"]["totalPoints"], 75);
    assert_eq!(report["state"]["level"], 1);
    assert_eq!(report["recorded"], true);

    // Re-scoring the same day replaces its record.
    let report = json(h, &["score", "--json"]);
    assert_eq!(report["state"]["totalPoints"], 75);
}

#[test]
fn dry_run_does_not_touch_the_ledger() {
    let home = tempfile::tempdir().unwrap();
    let report = json(home.path(), &["score", "--json", "--dry-run"]);
    assert_eq!(report["recorded"], false);
    assert_eq!(report["score"]["total"], 0);
    assert!(!home.path().join("data").join("ledger.json").exists());
}

#[test]
fn undo_within_grace_window() {
    let home = tempfile::tempdir().unwrap();
    let h = home.path();
    ok(h, &["task", "add", "Inbox", "zero", "--category", "Admin"]);
    let tasks = json(h, &["task", "list", "--json"]);
    let id = tasks[0]["id"].as_str().unwrap().to_string();

    ok(h, &["task", "done", &id]);
    let out = momentum(h, &["task", "done", &id]);
    assert!(!out.status.success(), "completing twice must fail");

    ok(h, &["task", "undo", &id]);
    let tasks = json(h, &["task", "list", "--json"]);
    assert_eq!(tasks[0]["status"], "Pending");
}

#[test]
fn level_command() {
    let home = tempfile::tempdir().unwrap();
    let out = ok(home.path(), &["level", "1250"]);
    assert_eq!(out.trim(), "level 3 (50%)");
}

#[test]
fn mood_log_and_list() {
    let home = tempfile::tempdir().unwrap();
    let h = home.path();
    ok(h, &["mood", "log", "good"]);
    ok(h, &["mood", "log", "great"]);
    let entries = json(h, &["mood", "list", "--json"]);
    let moods: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["mood"].as_str().unwrap())
        .collect();
    assert_eq!(moods, vec!["good", "great"]);

    let out = momentum(h, &["mood", "log", "ecstatic"]);
    assert!(!out.status.success());
}

#[test]
fn config_init_writes_defaults() {
    let home = tempfile::tempdir().unwrap();
    ok(home.path(), &["config", "init"]);
    let text = std::fs::read_to_string(home.path().join("config.toml")).unwrap();
    assert!(text.contains("America/Chicago"));
    assert!(text.contains("undo_grace_seconds = 30"));
}

#[test]
fn task_carried_over_from_yesterday_scores_today() {
    let home = tempfile::tempdir().unwrap();
    let h = home.path();
    let today = chrono::Utc::now()
        .with_timezone(&chrono_tz::America::Chicago)
        .date_naive();
    let yesterday = today.pred_opt().unwrap();
    let start = format!("{} 09:00", yesterday.format("%Y-%m-%d"));

    ok(h, &["task", "add", "Spec", "review", "--category", "Deep Work", "--start", &start]);
    let tasks = json(h, &["task", "list", "--date", &yesterday.to_string(), "--json"]);
    assert!(tasks[0]["startTime"].is_string());
    assert_eq!(tasks[0]["plannedDuration"], 30);
    let id = tasks[0]["id"].as_str().unwrap().to_string();
    ok(h, &["task", "done", &id]);

    let report = json(h, &["score", "--json"]);
    assert_eq!(report["score"]["taskPoints"], 20);
    assert_eq!(report["score"]["tasksCompleted"], 1);
    assert_eq!(report["score"]["tasksDue"], 0);
    assert_eq!(report["activityStreak"], 1);
}
