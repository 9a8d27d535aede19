//! Property tests for the level curve, daily rotation and completion ledger.

use chrono::NaiveDate;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

use upliftxp::domain::models::{
    default_catalog, level_for_xp, level_progress, xp_for_next_level, LevelInfo, TaskRef,
    UserProgress, DAILY_TASK_COUNT,
};
use upliftxp::services::{ledger, TaskRotation};

#[test]
fn test_level_fixed_points() {
    for (xp, level) in [
        (0, 1),
        (999, 1),
        (1000, 2),
        (1999, 2),
        (8999, 9),
        (9000, 10),
        (9999, 10),
        (10_000, 11),
    ] {
        assert_eq!(level_for_xp(xp), level, "xp {xp}");
    }
    assert_eq!(xp_for_next_level(0), 1000);
    assert_eq!(xp_for_next_level(9500), 10_000);
}

fn progress_for_day(seed: u64, xp: u64) -> (UserProgress, NaiveDate) {
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let mut progress = UserProgress {
        xp,
        ..UserProgress::default()
    };
    let mut rng = StdRng::seed_from_u64(seed);
    TaskRotation::default().forced(&mut rng).apply(&mut progress, today);
    progress.sync_level();
    (progress, today)
}

proptest! {
    #[test]
    fn prop_level_is_positive_and_monotone(a in any::<u64>(), b in any::<u64>()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(level_for_xp(low) >= 1);
        prop_assert!(level_for_xp(low) <= level_for_xp(high));
    }

    #[test]
    fn prop_level_steps_by_one_past_u32_levels(xp in 4_294_000_000_000u64..4_296_000_000_000) {
        prop_assert_eq!(level_for_xp(xp + 1000), level_for_xp(xp) + 1);
    }

    #[test]
    fn prop_progress_within_level(xp in 0u64..u64::MAX - 2000) {
        let info = LevelInfo::from_xp(xp);
        prop_assert!((0.0..1.0).contains(&level_progress(xp)));
        prop_assert!(info.next_level_xp > xp);
        prop_assert!(info.xp_remaining() <= 1000);
        prop_assert_eq!(level_for_xp(info.next_level_xp), info.level + 1);
    }

    #[test]
    fn prop_rotation_draws_distinct_catalog_tasks(seed in any::<u64>()) {
        let rotation = TaskRotation::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let drawn = rotation.draw(&mut rng);

        prop_assert_eq!(drawn.len(), DAILY_TASK_COUNT);
        let ids: HashSet<_> = drawn.iter().map(|t| t.id.clone()).collect();
        prop_assert_eq!(ids.len(), DAILY_TASK_COUNT);
        let catalog = default_catalog();
        prop_assert!(drawn.iter().all(|t| catalog.contains(t)));
    }

    #[test]
    fn prop_rotation_is_stable_within_a_day(seed in any::<u64>(), other in any::<u64>()) {
        let (progress, today) = progress_for_day(seed, 0);
        let mut rng = StdRng::seed_from_u64(other);
        let again = TaskRotation::default().rotate(&progress, today, &mut rng);
        prop_assert!(!again.reset_completion);
        prop_assert_eq!(again.daily_tasks, progress.daily_tasks);
    }

    #[test]
    fn prop_toggle_restores_xp(
        seed in any::<u64>(),
        xp in 0u64..100_000,
        pick in 0usize..DAILY_TASK_COUNT,
    ) {
        let (mut progress, _) = progress_for_day(seed, xp);
        let task = TaskRef::regular(progress.daily_tasks[pick].id.clone());

        let done = ledger::set_completion(&mut progress, &task, true).unwrap();
        prop_assert!(done.applied);
        prop_assert!(progress.xp > xp);
        prop_assert_eq!(progress.level, level_for_xp(progress.xp));

        let undone = ledger::set_completion(&mut progress, &task, false).unwrap();
        prop_assert!(undone.applied);
        prop_assert_eq!(progress.xp, xp);
        prop_assert_eq!(progress.total_tasks_completed, 0);
    }
}
