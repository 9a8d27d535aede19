//! Daily task rotation.
//!
//! Draws a fresh set of daily tasks from the catalog once per calendar day.

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::models::{default_catalog, Task, UserProgress, DAILY_TASK_COUNT};

/// Whether `progress` needs a new set of daily tasks for `today`.
pub fn rotation_due(progress: &UserProgress, today: NaiveDate) -> bool {
    progress.last_task_date != Some(today) || progress.daily_tasks.is_empty()
}

/// Outcome of a rotation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    pub daily_tasks: Vec<Task>,
    /// True when the tasks were redrawn and the completion map must be cleared.
    pub reset_completion: bool,
}

impl Rotation {
    /// Write the rotation into `progress`. Unchanged rotations leave it as is.
    pub fn apply(self, progress: &mut UserProgress, today: NaiveDate) {
        if !self.reset_completion {
            return;
        }
        progress.daily_tasks = self.daily_tasks;
        progress.completed_tasks.clear();
        progress.last_task_date = Some(today);
    }
}

/// Selects daily tasks from a fixed catalog.
#[derive(Debug, Clone)]
pub struct TaskRotation {
    catalog: Vec<Task>,
}

impl Default for TaskRotation {
    fn default() -> Self {
        Self::new(default_catalog())
    }
}

impl TaskRotation {
    pub const fn new(catalog: Vec<Task>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &[Task] {
        &self.catalog
    }

    /// Distinct tasks sampled uniformly without replacement.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Task> {
        let count = DAILY_TASK_COUNT.min(self.catalog.len());
        self.catalog.choose_multiple(rng, count).cloned().collect()
    }

    /// Redraw when a rotation is due, otherwise keep the current tasks.
    pub fn rotate<R: Rng + ?Sized>(
        &self,
        progress: &UserProgress,
        today: NaiveDate,
        rng: &mut R,
    ) -> Rotation {
        if rotation_due(progress, today) {
            self.forced(rng)
        } else {
            Rotation {
                daily_tasks: progress.daily_tasks.clone(),
                reset_completion: false,
            }
        }
    }

    /// Redraw regardless of the stored date.
    pub fn forced<R: Rng + ?Sized>(&self, rng: &mut R) -> Rotation {
        Rotation {
            daily_tasks: self.draw(rng),
            reset_completion: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_draw_returns_three_distinct_catalog_tasks() {
        let rotation = TaskRotation::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let tasks = rotation.draw(&mut rng);
            assert_eq!(tasks.len(), 3);
            let ids: HashSet<_> = tasks.iter().map(|t| t.id.clone()).collect();
            assert_eq!(ids.len(), 3);
            assert!(tasks.iter().all(|t| rotation.catalog().contains(t)));
        }
    }

    #[test]
    fn test_small_catalog_draws_everything() {
        let rotation = TaskRotation::new(vec![Task::new("a", "A", 5), Task::new("b", "B", 5)]);
        let tasks = rotation.draw(&mut rand::thread_rng());
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn test_rotation_is_idempotent_within_a_day() {
        let rotation = TaskRotation::default();
        let mut rng = rand::thread_rng();
        let mut progress = UserProgress::default();

        rotation.rotate(&progress, day(1), &mut rng).apply(&mut progress, day(1));
        let first = progress.daily_tasks.clone();
        assert_eq!(progress.last_task_date, Some(day(1)));

        let again = rotation.rotate(&progress, day(1), &mut rng);
        assert!(!again.reset_completion);
        again.apply(&mut progress, day(1));
        assert_eq!(progress.daily_tasks, first);
    }

    #[test]
    fn test_new_day_clears_completion() {
        let rotation = TaskRotation::default();
        let mut rng = rand::thread_rng();
        let mut progress = UserProgress::default();
        rotation.rotate(&progress, day(1), &mut rng).apply(&mut progress, day(1));
        let id = progress.daily_tasks[0].id.clone();
        progress.completed_tasks.insert(id, true);

        let next = rotation.rotate(&progress, day(2), &mut rng);
        assert!(next.reset_completion);
        next.apply(&mut progress, day(2));
        assert!(progress.completed_tasks.is_empty());
        assert_eq!(progress.last_task_date, Some(day(2)));
        assert_eq!(progress.daily_tasks.len(), 3);
    }

    #[test]
    fn test_empty_tasks_trigger_rotation_on_same_day() {
        let progress = UserProgress {
            last_task_date: Some(day(5)),
            ..UserProgress::default()
        };
        assert!(rotation_due(&progress, day(5)));
    }
}
