use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config;
mod display;
mod habit_cmd;
mod health_cmd;
mod mood_cmd;
mod score_cmd;
mod setup;
mod state;
mod task_cmd;

#[derive(Parser, Debug)]
#[command(
    name = "momentum",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("MOMENTUM_BUILD_SHA"), ")"),
    about = "Habit streaks and productivity scoring"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// One-time interactive setup: timezone and the habits to track
    Setup,

    /// Inspect or initialize ~/.momentum/config.toml
    Config {
        #[command(subcommand)]
        command: config::ConfigCommand,
    },

    /// Habits and their daily completion marks
    Habit {
        #[command(subcommand)]
        command: habit_cmd::HabitCommand,
    },

    /// Scheduled tasks
    Task {
        #[command(subcommand)]
        command: task_cmd::TaskCommand,
    },

    /// Energy and sleep snapshot that scales task points
    Health {
        #[command(subcommand)]
        command: health_cmd::HealthCommand,
    },

    /// Daily mood log
    Mood {
        #[command(subcommand)]
        command: mood_cmd::MoodCommand,
    },

    /// Score a day and record it in the ledger
    Score {
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,

        #[arg(long, default_value_t = false)]
        json: bool,

        /// Compute without recording
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// Resolve a point total to a level
    Level { points: u64 },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Setup => setup::run_setup(),
        Command::Config { command } => config::run(command),
        Command::Habit { command } => habit_cmd::run(command),
        Command::Task { command } => task_cmd::run(command),
        Command::Health { command } => health_cmd::run(command),
        Command::Mood { command } => mood_cmd::run(command),
        Command::Score {
            date,
            json,
            dry_run,
        } => score_cmd::run_score(date, json, dry_run),
        Command::Level { points } => score_cmd::run_level(points),
    }
}
