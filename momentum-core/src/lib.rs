//! momentum-core: habit tracking and productivity scoring engine
//!
//! - Streak calculator: consecutive-day runs from completion dates
//! - Completion store: habits with write-through persistence
//! - Point engine: task completions -> capped daily points
//! - Level resolver: cumulative points -> level + progress
//!
//! Persistence goes through [`KeyValueStore`]; nothing here touches global state.

pub mod completion_store;
pub mod error;
pub mod habit;
pub mod health;
pub mod kv;
pub mod ledger;
pub mod level;
pub mod mood;
pub mod points;
pub mod streak;
pub mod styling;
pub mod task;
pub mod time;

pub use completion_store::{
    default_habits, CompletionStore, HabitRepository, HABITS_BACKUP_KEY, HABITS_KEY,
};
pub use error::{StoreError, TaskError};
pub use habit::{Habit, HabitRecord, DEFAULT_HABITS};
pub use health::{EnergyLevel, HealthSnapshot, SleepQuality};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use ledger::{DayRecord, ScoreLedger, ScoreState, LEDGER_KEY};
pub use level::{resolve_level, Level, POINTS_PER_LEVEL};
pub use mood::{Mood, MoodEntry, MoodLog, DEFAULT_RETENTION_DAYS, MOODS_KEY};
pub use points::{
    round5, score_completed_task, score_day, CategoryWeights, DailyScore, ScoringPolicy,
    StreakContext,
};
pub use streak::{current_streak, longest_streak, streak_bonus, StreakAnchor};
pub use styling::{category_icon, habit_style, CategoryColors, ColorTag, HabitStyle, IconTag};
pub use task::{completion_days, tasks_completed_on, tasks_due_on, Task, TaskStatus};
