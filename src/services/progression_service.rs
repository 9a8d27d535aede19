//! Progression engine service.
//!
//! Entry points for everything that mutates a user's progress: the day
//! transition on load, task completion, the developer date override and the
//! debug reset. Each one is a single optimistic update of the document.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    level_for_xp, AccountId, LevelInfo, ProgressionConfig, Task, TaskRef, UserProgress,
    STREAK_NOT_STARTED,
};
use crate::domain::ports::ProgressStore;
use crate::services::document_update::{update_progress, Mutation, Updated};
use crate::services::ledger::{self, LedgerChange};
use crate::services::rollover::{self, StreakPolicy, StreakUpdate};
use crate::services::rotation::{rotation_due, TaskRotation};

/// What the day transition did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayTransition {
    Unchanged,
    Rotated,
    RolledOver {
        penalties_added: usize,
        streak: StreakUpdate,
    },
}

/// Progress as presented after an engine operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySnapshot {
    pub progress: UserProgress,
    pub level: LevelInfo,
    pub transition: DayTransition,
}

impl DaySnapshot {
    fn new(progress: UserProgress, transition: DayTransition) -> Self {
        Self {
            level: progress.level_info(),
            progress,
            transition,
        }
    }
}

/// Result of a completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionReport {
    pub change: LedgerChange,
    pub level: LevelInfo,
    pub level_up: bool,
}

/// Today's date as the engine sees it.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse a developer date override in strict `YYYY-MM-DD` form.
pub fn parse_override_date(input: &str) -> DomainResult<NaiveDate> {
    let invalid = || DomainError::InvalidDateInput(input.to_string());
    let bytes = input.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| invalid())
}

pub struct ProgressionService<S: ProgressStore> {
    store: Arc<S>,
    rotation: TaskRotation,
    config: ProgressionConfig,
}

impl<S: ProgressStore> ProgressionService<S> {
    pub fn new(store: Arc<S>, config: ProgressionConfig) -> Self {
        Self {
            store,
            rotation: TaskRotation::default(),
            config,
        }
    }

    /// Use a custom task catalog instead of the built-in one.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Vec<Task>) -> Self {
        self.rotation = TaskRotation::new(catalog);
        self
    }

    fn streak_policy(&self) -> StreakPolicy {
        StreakPolicy::from_reset_flag(self.config.reset_streak_on_miss)
    }

    async fn update<T, F>(&self, account_id: &AccountId, mutate: F) -> DomainResult<Updated<T>>
    where
        F: FnMut(&mut UserProgress) -> DomainResult<Mutation<T>> + Send,
        T: Send,
    {
        update_progress(
            self.store.as_ref(),
            account_id,
            self.config.max_write_attempts,
            mutate,
        )
        .await
    }

    /// Create an empty document when the account has none yet.
    async fn ensure_document(&self, account_id: &AccountId) -> DomainResult<()> {
        if self.store.get(account_id).await?.is_none() {
            // Losing this race to another writer is fine: the document exists.
            self.store
                .compare_and_swap(account_id, None, &UserProgress::default())
                .await?;
        }
        Ok(())
    }

    /// Bring the document up to `today`: rollover then rotation after a day
    /// change, rotation alone when no tasks are assigned.
    #[instrument(skip_all, fields(account_id = %account_id))]
    pub async fn load_today(
        &self,
        account_id: &AccountId,
        today: NaiveDate,
    ) -> DomainResult<DaySnapshot> {
        self.ensure_document(account_id).await?;
        let policy = self.streak_policy();

        let updated = self
            .update(account_id, |progress| {
                let mut rng = rand::thread_rng();
                if progress.last_task_date.is_some_and(|last| last != today) {
                    let resolution =
                        rollover::resolve(progress, today, policy, Utc::now(), &mut rng);
                    let transition = DayTransition::RolledOver {
                        penalties_added: resolution.generated,
                        streak: resolution.streak_update,
                    };
                    resolution.apply(progress);
                    self.rotation.forced(&mut rng).apply(progress, today);
                    Ok(Mutation::Write(transition))
                } else if rotation_due(progress, today) {
                    self.rotation.forced(&mut rng).apply(progress, today);
                    Ok(Mutation::Write(DayTransition::Rotated))
                } else {
                    Ok(Mutation::Skip(DayTransition::Unchanged))
                }
            })
            .await?;

        if let DayTransition::RolledOver {
            penalties_added,
            streak,
        } = updated.value
        {
            info!(
                account_id = %account_id,
                %today,
                penalties_added,
                streak = updated.progress.streak,
                streak_update = ?streak,
                "day rolled over"
            );
        }
        Ok(DaySnapshot::new(updated.progress, updated.value))
    }

    /// Mark a regular task done or not done, or complete a penalty task.
    #[instrument(skip_all, fields(account_id = %account_id, task_id = %task.id))]
    pub async fn set_completion(
        &self,
        account_id: &AccountId,
        task: &TaskRef,
        completed: bool,
    ) -> DomainResult<CompletionReport> {
        let updated = self
            .update(account_id, |progress| {
                let change = ledger::set_completion(progress, task, completed)?;
                Ok(if change.applied {
                    Mutation::Write(change)
                } else {
                    Mutation::Skip(change)
                })
            })
            .await?;

        let change = updated.value;
        let level = updated.progress.level_info();
        let level_up = level.level > level_for_xp(change.xp_before);
        if change.applied {
            info!(
                account_id = %account_id,
                task_id = %task.id,
                kind = %task.kind,
                completed,
                xp = change.xp_after,
                level = level.level,
                "task completion recorded"
            );
        }
        Ok(CompletionReport {
            change,
            level,
            level_up,
        })
    }

    /// Developer override: treat `date` as today and force a full day
    /// transition, even when it equals the stored date.
    #[instrument(skip_all, fields(account_id = %account_id))]
    pub async fn simulate_day(
        &self,
        account_id: &AccountId,
        date: &str,
    ) -> DomainResult<DaySnapshot> {
        let today = parse_override_date(date)?;
        self.ensure_document(account_id).await?;
        let policy = self.streak_policy();

        let updated = self
            .update(account_id, |progress| {
                let mut rng = rand::thread_rng();
                let resolution = rollover::resolve(progress, today, policy, Utc::now(), &mut rng);
                let transition = DayTransition::RolledOver {
                    penalties_added: resolution.generated,
                    streak: resolution.streak_update,
                };
                resolution.apply(progress);
                self.rotation.forced(&mut rng).apply(progress, today);
                Ok(Mutation::Write(transition))
            })
            .await?;

        info!(account_id = %account_id, %today, streak = updated.progress.streak, "simulated day");
        Ok(DaySnapshot::new(updated.progress, updated.value))
    }

    /// Debug reset. Penalty tasks survive; daily tasks are redrawn on the
    /// next load.
    #[instrument(skip_all, fields(account_id = %account_id))]
    pub async fn reset(
        &self,
        account_id: &AccountId,
        today: NaiveDate,
    ) -> DomainResult<UserProgress> {
        let updated = self
            .update(account_id, |progress| {
                progress.xp = 0;
                progress.streak = 0;
                progress.last_streak_date = STREAK_NOT_STARTED;
                progress.completed_tasks.clear();
                progress.daily_tasks.clear();
                progress.last_task_date = Some(today);
                Ok(Mutation::Write(()))
            })
            .await?;
        info!(account_id = %account_id, "progress reset");
        Ok(updated.progress)
    }

    /// Read-only view of the stored document.
    pub async fn snapshot(&self, account_id: &AccountId) -> DomainResult<DaySnapshot> {
        let stored = self
            .store
            .get(account_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(account_id.to_string()))?;
        Ok(DaySnapshot::new(stored.progress, DayTransition::Unchanged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteProgressStore};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    async fn setup_service() -> (ProgressionService<SqliteProgressStore>, AccountId) {
        let pool = create_migrated_test_pool().await.unwrap();
        let store = Arc::new(SqliteProgressStore::new(pool));
        (
            ProgressionService::new(store, ProgressionConfig::default()),
            AccountId::new("acct-1"),
        )
    }

    #[test]
    fn test_parse_override_date() {
        assert_eq!(
            parse_override_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        for bad in [
            "2024/01/01",
            "24-01-01",
            "2024-1-01",
            "2024-01-01 ",
            "abcd-ef-gh",
            "2023-02-30",
            "",
        ] {
            assert!(
                matches!(parse_override_date(bad), Err(DomainError::InvalidDateInput(_))),
                "{bad}"
            );
        }
    }

    #[tokio::test]
    async fn test_first_load_rotates_without_rollover() {
        let (service, id) = setup_service().await;
        let snapshot = service.load_today(&id, day(1)).await.unwrap();
        assert_eq!(snapshot.transition, DayTransition::Rotated);
        assert_eq!(snapshot.progress.daily_tasks.len(), 3);
        assert_eq!(snapshot.progress.last_task_date, Some(day(1)));
        assert!(snapshot.progress.penalty_tasks.is_empty());
    }

    #[tokio::test]
    async fn test_second_load_same_day_is_unchanged() {
        let (service, id) = setup_service().await;
        let first = service.load_today(&id, day(1)).await.unwrap();
        let second = service.load_today(&id, day(1)).await.unwrap();
        assert_eq!(second.transition, DayTransition::Unchanged);
        assert_eq!(second.progress.daily_tasks, first.progress.daily_tasks);
    }

    #[tokio::test]
    async fn test_next_day_turns_misses_into_penalties() {
        let (service, id) = setup_service().await;
        let first = service.load_today(&id, day(1)).await.unwrap();
        let done = first.progress.daily_tasks[0].id.clone();
        service
            .set_completion(&id, &TaskRef::regular(done), true)
            .await
            .unwrap();

        let next = service.load_today(&id, day(2)).await.unwrap();
        assert!(matches!(
            next.transition,
            DayTransition::RolledOver {
                penalties_added: 2,
                streak: StreakUpdate::Unchanged
            }
        ));
        assert_eq!(next.progress.penalty_tasks.len(), 2);
        assert!(next.progress.completed_tasks.is_empty());
        assert_eq!(next.progress.streak, 0);
    }

    #[tokio::test]
    async fn test_full_day_increments_streak() {
        let (service, id) = setup_service().await;
        let first = service.load_today(&id, day(1)).await.unwrap();
        for task in &first.progress.daily_tasks {
            service
                .set_completion(&id, &TaskRef::regular(task.id.clone()), true)
                .await
                .unwrap();
        }
        let next = service.load_today(&id, day(2)).await.unwrap();
        assert_eq!(next.progress.streak, 1);
        assert_eq!(next.progress.last_streak_date, day(2));
        assert!(next.progress.penalty_tasks.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_completion_does_not_double_xp() {
        let (service, id) = setup_service().await;
        let first = service.load_today(&id, day(1)).await.unwrap();
        let task = &first.progress.daily_tasks[0];
        let task_ref = TaskRef::regular(task.id.clone());

        service.set_completion(&id, &task_ref, true).await.unwrap();
        let report = service.set_completion(&id, &task_ref, true).await.unwrap();
        assert!(!report.change.applied);
        assert_eq!(report.level.xp, u64::from(task.xp_reward));
    }

    #[tokio::test]
    async fn test_unknown_task_is_silent_not_found() {
        let (service, id) = setup_service().await;
        service.load_today(&id, day(1)).await.unwrap();
        let err = service
            .set_completion(&id, &TaskRef::regular("not-a-task"), true)
            .await
            .unwrap_err();
        assert!(err.is_silent());
    }

    #[tokio::test]
    async fn test_simulate_day_rejects_bad_input_without_writing() {
        let (service, id) = setup_service().await;
        service.load_today(&id, day(1)).await.unwrap();
        let before = service.snapshot(&id).await.unwrap();

        let err = service.simulate_day(&id, "06/02/2024").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidDateInput(_)));
        assert_eq!(service.snapshot(&id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_simulate_same_day_still_rolls_over() {
        let (service, id) = setup_service().await;
        service.load_today(&id, day(1)).await.unwrap();
        let snapshot = service.simulate_day(&id, "2024-06-01").await.unwrap();
        assert!(matches!(
            snapshot.transition,
            DayTransition::RolledOver {
                penalties_added: 3,
                ..
            }
        ));
        assert_eq!(snapshot.progress.last_task_date, Some(day(1)));
    }

    #[tokio::test]
    async fn test_reset_keeps_penalties() {
        let (service, id) = setup_service().await;
        service.load_today(&id, day(1)).await.unwrap();
        service.load_today(&id, day(2)).await.unwrap();
        let progress = service.reset(&id, day(2)).await.unwrap();

        assert_eq!(progress.xp, 0);
        assert_eq!(progress.level, 1);
        assert_eq!(progress.next_level_xp, 1000);
        assert_eq!(progress.streak, 0);
        assert_eq!(progress.last_streak_date, STREAK_NOT_STARTED);
        assert!(progress.daily_tasks.is_empty());
        assert_eq!(progress.penalty_tasks.len(), 3);

        let reloaded = service.load_today(&id, day(2)).await.unwrap();
        assert_eq!(reloaded.transition, DayTransition::Rotated);
    }

    #[tokio::test]
    async fn test_reset_streak_policy_from_config() {
        let pool = create_migrated_test_pool().await.unwrap();
        let store = Arc::new(SqliteProgressStore::new(pool));
        let config = ProgressionConfig {
            reset_streak_on_miss: true,
            ..ProgressionConfig::default()
        };
        let service = ProgressionService::new(store.clone(), config);
        let id = AccountId::new("acct-2");
        let progress = UserProgress {
            streak: 5,
            last_task_date: Some(day(1)),
            daily_tasks: vec![Task::new("walk", "🚶‍♂️ Take a 15-minute walk", 20)],
            ..UserProgress::default()
        };
        store.compare_and_swap(&id, None, &progress).await.unwrap();

        let snapshot = service.load_today(&id, day(2)).await.unwrap();
        assert_eq!(snapshot.progress.streak, 0);
    }
}
