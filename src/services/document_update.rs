//! Optimistic read-modify-write over a progress document.

use tracing::{debug, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AccountId, UserProgress};
use crate::domain::ports::ProgressStore;

/// Decision returned by a mutation closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<T> {
    /// Persist the mutated document.
    Write(T),
    /// Leave the stored document as it is.
    Skip(T),
}

/// Result of [`update_progress`].
#[derive(Debug, Clone, PartialEq)]
pub struct Updated<T> {
    /// Document as persisted (or as read, when skipped).
    pub progress: UserProgress,
    pub value: T,
    pub written: bool,
}

/// Apply `mutate` to the freshest copy of the document and write it back if
/// the version did not move in between.
///
/// On a version mismatch the document is re-read and `mutate` runs again, so
/// it must decide from the document it is given and not from captured state.
/// Errors returned by `mutate` abort without writing.
pub async fn update_progress<S, T, F>(
    store: &S,
    account_id: &AccountId,
    max_attempts: u32,
    mut mutate: F,
) -> DomainResult<Updated<T>>
where
    S: ProgressStore + ?Sized,
    F: FnMut(&mut UserProgress) -> DomainResult<Mutation<T>> + Send,
    T: Send,
{
    let attempts = max_attempts.max(1);
    for attempt in 1..=attempts {
        let stored = store
            .get(account_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(account_id.to_string()))?;

        let mut progress = stored.progress.clone();
        let value = match mutate(&mut progress)? {
            Mutation::Skip(value) => {
                return Ok(Updated {
                    progress: stored.progress,
                    value,
                    written: false,
                });
            }
            Mutation::Write(value) => value,
        };

        progress.normalize();
        if store
            .compare_and_swap(account_id, Some(stored.version), &progress)
            .await?
        {
            return Ok(Updated {
                progress,
                value,
                written: true,
            });
        }
        debug!(
            account_id = %account_id,
            attempt,
            version = stored.version,
            "progress document changed during update, retrying"
        );
    }

    warn!(account_id = %account_id, attempts, "giving up on progress update");
    Err(DomainError::ConcurrencyConflict {
        entity: "user_progress".to_string(),
        id: account_id.to_string(),
        attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteProgressStore};

    async fn setup() -> (SqliteProgressStore, AccountId) {
        let pool = create_migrated_test_pool().await.unwrap();
        let store = SqliteProgressStore::new(pool);
        let id = AccountId::new("acct-1");
        assert!(store
            .compare_and_swap(&id, None, &UserProgress::default())
            .await
            .unwrap());
        (store, id)
    }

    #[tokio::test]
    async fn test_write_persists_and_normalizes() {
        let (store, id) = setup().await;
        let updated = update_progress(&store, &id, 3, |p| {
            p.xp = 1500;
            Ok(Mutation::Write(()))
        })
        .await
        .unwrap();
        assert!(updated.written);
        assert_eq!(updated.progress.level, 2);

        let stored = store.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.progress.xp, 1500);
        assert_eq!(stored.progress.level, 2);
        assert_eq!(stored.version, 2);
    }

    #[tokio::test]
    async fn test_skip_does_not_write() {
        let (store, id) = setup().await;
        let updated = update_progress(&store, &id, 3, |p| {
            p.xp = 99;
            Ok(Mutation::Skip(()))
        })
        .await
        .unwrap();
        assert!(!updated.written);
        assert_eq!(updated.progress.xp, 0);
        assert_eq!(store.get(&id).await.unwrap().unwrap().version, 1);
    }

    #[tokio::test]
    async fn test_mutation_error_aborts() {
        let (store, id) = setup().await;
        let result: DomainResult<Updated<()>> = update_progress(&store, &id, 3, |p| {
            p.xp = 10;
            Err(DomainError::TaskNotFound("x".to_string()))
        })
        .await;
        assert!(matches!(result, Err(DomainError::TaskNotFound(_))));
        assert_eq!(store.get(&id).await.unwrap().unwrap().progress.xp, 0);
    }

    #[tokio::test]
    async fn test_missing_document_is_user_not_found() {
        let (store, _) = setup().await;
        let result = update_progress(&store, &AccountId::new("nobody"), 3, |_| {
            Ok(Mutation::Write(()))
        })
        .await;
        assert!(matches!(result, Err(DomainError::UserNotFound(_))));
    }
}
