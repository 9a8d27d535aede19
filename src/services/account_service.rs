//! Account lifecycle: registration, sign in and the session check other
//! commands rely on.

use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{normalize_email, Account, AccountId, UserProgress};
use crate::domain::ports::{IdentityProvider, ProgressStore};

pub struct AccountService<I: IdentityProvider, S: ProgressStore> {
    identity: Arc<I>,
    store: Arc<S>,
}

impl<I: IdentityProvider, S: ProgressStore> AccountService<I, S> {
    pub fn new(identity: Arc<I>, store: Arc<S>) -> Self {
        Self { identity, store }
    }

    /// Register an account and create its initial progress document.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> DomainResult<AccountId> {
        if password.len() < 6 {
            return Err(DomainError::ValidationFailed(
                "Password must be at least 6 characters".to_string(),
            ));
        }
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(DomainError::ValidationFailed(
                "Username cannot be empty".to_string(),
            ));
        }

        let id = self.identity.sign_up(email, password, display_name).await?;
        let progress =
            UserProgress::for_new_account(display_name, normalize_email(email), Utc::now());
        self.store.compare_and_swap(&id, None, &progress).await?;
        info!(account_id = %id, "account created");
        Ok(id)
    }

    /// Sign in and record the login time on the progress document.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn sign_in(&self, email: &str, password: &str) -> DomainResult<AccountId> {
        let id = self.identity.sign_in(email, password).await?;
        let mut patch = Map::new();
        patch.insert(
            "lastLogin".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        self.store.set_user_progress(&id, patch, true).await?;
        info!(account_id = %id, "signed in");
        Ok(id)
    }

    pub async fn sign_out(&self) -> DomainResult<()> {
        self.identity.sign_out().await
    }

    /// The signed-in account, or `AuthRequired`.
    pub async fn require_account(&self) -> DomainResult<AccountId> {
        self.identity
            .current_account()
            .await?
            .ok_or(DomainError::AuthRequired)
    }

    /// Details of the signed-in account.
    pub async fn whoami(&self) -> DomainResult<Account> {
        let id = self.require_account().await?;
        self.identity
            .account(&id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{
        create_migrated_test_pool, SqliteIdentityProvider, SqliteProgressStore,
    };

    async fn setup_service() -> (
        AccountService<SqliteIdentityProvider, SqliteProgressStore>,
        Arc<SqliteProgressStore>,
    ) {
        let pool = create_migrated_test_pool().await.unwrap();
        let identity = Arc::new(SqliteIdentityProvider::new(pool.clone()));
        let store = Arc::new(SqliteProgressStore::new(pool));
        (AccountService::new(identity, store.clone()), store)
    }

    #[tokio::test]
    async fn test_sign_up_creates_initial_progress() {
        let (service, store) = setup_service().await;
        let id = service
            .sign_up("sam@example.com", "hunter22", "sam")
            .await
            .unwrap();

        let stored = store.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.progress.xp, 0);
        assert_eq!(stored.progress.level, 1);
        assert_eq!(stored.progress.streak, 0);
        assert_eq!(stored.progress.username.as_deref(), Some("sam"));
        assert!(stored.progress.created_at.is_some());

        assert_eq!(service.require_account().await.unwrap(), id);
    }

    #[tokio::test]
    async fn test_document_email_matches_account_email() {
        let (service, store) = setup_service().await;
        let id = service
            .sign_up("  Sam@Example.COM ", "hunter22", "sam")
            .await
            .unwrap();

        let stored = store.get(&id).await.unwrap().unwrap();
        let account = service.whoami().await.unwrap();
        assert_eq!(stored.progress.email.as_deref(), Some("sam@example.com"));
        assert_eq!(stored.progress.email.as_deref(), Some(account.email.as_str()));
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let (service, _) = setup_service().await;
        let err = service.sign_up("a@b.c", "123", "a").await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
    }

    #[tokio::test]
    async fn test_sign_out_then_require_account_fails() {
        let (service, _) = setup_service().await;
        service
            .sign_up("sam@example.com", "hunter22", "sam")
            .await
            .unwrap();
        service.sign_out().await.unwrap();
        assert!(matches!(
            service.require_account().await,
            Err(DomainError::AuthRequired)
        ));
    }

    #[tokio::test]
    async fn test_sign_in_records_last_login_and_keeps_progress() {
        let (service, store) = setup_service().await;
        let id = service
            .sign_up("sam@example.com", "hunter22", "sam")
            .await
            .unwrap();
        service.sign_out().await.unwrap();

        let signed_in = service.sign_in("SAM@example.com", "hunter22").await.unwrap();
        assert_eq!(signed_in, id);
        let stored = store.get(&id).await.unwrap().unwrap();
        assert!(stored.progress.last_login.is_some());
        assert_eq!(stored.progress.username.as_deref(), Some("sam"));
        assert_eq!(service.whoami().await.unwrap().display_name, "sam");
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let (service, _) = setup_service().await;
        service
            .sign_up("sam@example.com", "hunter22", "sam")
            .await
            .unwrap();
        let err = service.sign_in("sam@example.com", "nope").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }
}
