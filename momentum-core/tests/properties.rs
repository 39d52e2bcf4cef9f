use chrono::{Days, NaiveDate, TimeZone, Utc};
use momentum_core::{
    current_streak, resolve_level, round5, score_completed_task, score_day, CompletionStore,
    EnergyLevel, HealthSnapshot, MemoryStore, ScoringPolicy, SleepQuality, StreakAnchor,
    StreakContext, Task,
};
use proptest::prelude::*;

fn base_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

fn energy() -> impl Strategy<Value = EnergyLevel> {
    prop_oneof![Just(EnergyLevel::Low), Just(EnergyLevel::Medium), Just(EnergyLevel::High)]
}

fn sleep() -> impl Strategy<Value = SleepQuality> {
    prop_oneof![Just(SleepQuality::Poor), Just(SleepQuality::Fair), Just(SleepQuality::Good)]
}

fn category() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Deep Work".to_string()),
        Just("Learning".to_string()),
        Just("Meeting".to_string()),
        Just("Admin".to_string()),
        "[a-z]{1,10}",
    ]
}

proptest! {
    #[test]
    fn unbroken_run_of_n_days_has_streak_n(n in 1u64..400, offset in 0u64..2000) {
        let today = base_day().checked_add_days(Days::new(offset)).unwrap();
        let dates: Vec<NaiveDate> = (0..n)
            .map(|i| today.checked_sub_days(Days::new(i)).unwrap())
            .collect();
        prop_assert_eq!(current_streak(&dates, today, StreakAnchor::Today), n as u32);
        prop_assert_eq!(current_streak(&dates, today, StreakAnchor::TodayOrYesterday), n as u32);
    }

    #[test]
    fn no_mark_today_or_yesterday_means_zero(gaps in prop::collection::vec(2u64..60, 0..30)) {
        let today = base_day();
        let dates: Vec<NaiveDate> = gaps
            .iter()
            .map(|g| today.checked_sub_days(Days::new(*g)).unwrap())
            .collect();
        prop_assert_eq!(current_streak(&dates, today, StreakAnchor::Today), 0);
        prop_assert_eq!(current_streak(&dates, today, StreakAnchor::TodayOrYesterday), 0);
    }

    #[test]
    fn double_toggle_restores_dates(marks in prop::collection::vec(0u64..30, 0..20), target in 0u64..30) {
        let kv = MemoryStore::new();
        let today = base_day();
        let mut store = CompletionStore::open(&kv, today, StreakAnchor::Today).unwrap();
        let id = store.habits()[0].id().to_string();

        for m in &marks {
            let day = today.checked_sub_days(Days::new(*m)).unwrap();
            if !store.get(&id).unwrap().is_completed_on(day) {
                store.toggle(&id, day).unwrap();
            }
        }
        let before = store.get(&id).unwrap().completed_dates().clone();

        let day = today.checked_sub_days(Days::new(target)).unwrap();
        store.toggle(&id, day).unwrap();
        store.toggle(&id, day).unwrap();

        prop_assert_eq!(store.get(&id).unwrap().completed_dates(), &before);
    }

    #[test]
    fn level_bounds(points in any::<u64>()) {
        let l = resolve_level(points);
        prop_assert!(l.level >= 1);
        prop_assert!(l.progress >= 0.0 && l.progress < 1.0);
    }

    #[test]
    fn round5_is_a_multiple_of_five(v in 0.0f64..10_000.0) {
        prop_assert_eq!(round5(v) % 5, 0);
    }

    #[test]
    fn task_points_are_multiples_of_five(
        cat in category(),
        e in energy(),
        s in sleep(),
        focus in any::<bool>(),
    ) {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let task = Task::new("t", "t", cat, t0).completed(t0, focus);
        let points = score_completed_task(&task, &HealthSnapshot::new(e, s), &ScoringPolicy::default());
        prop_assert_eq!(points % 5, 0);
    }

    #[test]
    fn daily_task_points_never_exceed_cap(
        cats in prop::collection::vec(category(), 0..40),
        e in energy(),
        s in sleep(),
        streak in 0u32..100,
    ) {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let tasks: Vec<Task> = cats
            .into_iter()
            .enumerate()
            .map(|(i, c)| Task::new(format!("t{i}"), "t", c, t0).completed(t0, i % 2 == 0))
            .collect();
        let policy = ScoringPolicy::default();
        let tz: chrono_tz::Tz = "America/Chicago".parse().unwrap();
        let score = score_day(
            &tasks,
            base_day(),
            tz,
            &HealthSnapshot::new(e, s),
            StreakContext { activity_streak: streak },
            &policy,
        );
        prop_assert!(score.task_points <= policy.daily_cap);
        prop_assert_eq!(score.total % 5, 0);
    }
}
