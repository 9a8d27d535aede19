//! Document store port for per-account progress.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::errors::DomainResult;
use crate::domain::models::{AccountId, StoredProgress, UserProgress};

/// Storage interface for `UserProgress` documents.
///
/// Every successful write increments the document version, so callers can
/// implement read-modify-write cycles with [`ProgressStore::compare_and_swap`].
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Get the document and its version.
    async fn get(&self, account_id: &AccountId) -> DomainResult<Option<StoredProgress>>;

    /// Write `progress` only if the stored version still equals `expected`.
    ///
    /// `expected = None` means "only if no document exists yet". Returns
    /// `false` when the condition did not hold and nothing was written.
    async fn compare_and_swap(
        &self,
        account_id: &AccountId,
        expected: Option<u64>,
        progress: &UserProgress,
    ) -> DomainResult<bool>;

    /// Shallow-merge `patch` into the stored document, or replace the whole
    /// document when `merge` is false. Creates the document if absent.
    async fn set_user_progress(
        &self,
        account_id: &AccountId,
        patch: Map<String, Value>,
        merge: bool,
    ) -> DomainResult<()>;

    /// Highest-XP documents, descending.
    async fn query_top_by_xp(&self, limit: u32) -> DomainResult<Vec<StoredProgress>>;
}
