//! SQLite implementation of the ProgressStore.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AccountId, StoredProgress, UserProgress};
use crate::domain::ports::ProgressStore;

const DEFAULT_MAX_ATTEMPTS: u32 = 5;

#[derive(Clone)]
pub struct SqliteProgressStore {
    pool: SqlitePool,
    max_attempts: u32,
}

impl SqliteProgressStore {
    pub const fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Retry budget for `set_user_progress`.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

fn xp_column(progress: &UserProgress) -> i64 {
    i64::try_from(progress.xp).unwrap_or(i64::MAX)
}

#[async_trait]
impl ProgressStore for SqliteProgressStore {
    async fn get(&self, account_id: &AccountId) -> DomainResult<Option<StoredProgress>> {
        let row: Option<ProgressRow> = sqlx::query_as(
            "SELECT account_id, document, version FROM user_progress WHERE account_id = ?",
        )
        .bind(account_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn compare_and_swap(
        &self,
        account_id: &AccountId,
        expected: Option<u64>,
        progress: &UserProgress,
    ) -> DomainResult<bool> {
        let document = serde_json::to_string(progress)?;
        let now = Utc::now().to_rfc3339();

        let result = match expected {
            None => {
                sqlx::query(
                    r#"INSERT INTO user_progress (account_id, document, xp, version, updated_at)
                       VALUES (?, ?, ?, 1, ?)
                       ON CONFLICT(account_id) DO NOTHING"#,
                )
                .bind(account_id.as_str())
                .bind(&document)
                .bind(xp_column(progress))
                .bind(&now)
                .execute(&self.pool)
                .await?
            }
            Some(version) => {
                let version = i64::try_from(version).map_err(|_| {
                    DomainError::ValidationFailed(format!("Invalid version: {version}"))
                })?;
                sqlx::query(
                    r#"UPDATE user_progress
                       SET document = ?, xp = ?, version = version + 1, updated_at = ?
                       WHERE account_id = ? AND version = ?"#,
                )
                .bind(&document)
                .bind(xp_column(progress))
                .bind(&now)
                .bind(account_id.as_str())
                .bind(version)
                .execute(&self.pool)
                .await?
            }
        };

        Ok(result.rows_affected() == 1)
    }

    async fn set_user_progress(
        &self,
        account_id: &AccountId,
        patch: Map<String, Value>,
        merge: bool,
    ) -> DomainResult<()> {
        let attempts = self.max_attempts.max(1);
        for _ in 0..attempts {
            let current = self.get(account_id).await?;
            let expected = current.as_ref().map(|stored| stored.version);

            let document = match current {
                Some(stored) if merge => {
                    let mut document = match serde_json::to_value(&stored.progress)? {
                        Value::Object(map) => map,
                        _ => Map::new(),
                    };
                    document.extend(patch.clone());
                    document
                }
                _ => patch.clone(),
            };
            let mut progress: UserProgress = serde_json::from_value(Value::Object(document))?;
            progress.normalize();

            if self.compare_and_swap(account_id, expected, &progress).await? {
                return Ok(());
            }
        }

        Err(DomainError::ConcurrencyConflict {
            entity: "user_progress".to_string(),
            id: account_id.to_string(),
            attempts,
        })
    }

    async fn query_top_by_xp(&self, limit: u32) -> DomainResult<Vec<StoredProgress>> {
        let rows: Vec<ProgressRow> = sqlx::query_as(
            r#"SELECT account_id, document, version FROM user_progress
               ORDER BY xp DESC, account_id ASC LIMIT ?"#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct ProgressRow {
    account_id: String,
    document: String,
    version: i64,
}

impl TryFrom<ProgressRow> for StoredProgress {
    type Error = DomainError;

    fn try_from(row: ProgressRow) -> Result<Self, Self::Error> {
        let progress: UserProgress = serde_json::from_str(&row.document)?;
        let version = u64::try_from(row.version).map_err(|_| {
            DomainError::SerializationError(format!("negative version {}", row.version))
        })?;
        Ok(Self {
            account_id: AccountId::new(row.account_id),
            progress,
            version,
        })
    }
}
