//! Local identity provider backed by SQLite.
//!
//! Accounts live in `accounts`; the signed-in account is the single row of
//! `current_session`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::password::{hash_password, verify_password};
use super::parse_datetime;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{normalize_email, Account, AccountId};
use crate::domain::ports::IdentityProvider;

#[derive(Clone)]
pub struct SqliteIdentityProvider {
    pool: SqlitePool,
}

impl SqliteIdentityProvider {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn start_session(&self, id: &AccountId) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO current_session (slot, account_id, signed_in_at) VALUES (1, ?, ?)
               ON CONFLICT(slot) DO UPDATE
               SET account_id = excluded.account_id, signed_in_at = excluded.signed_in_at"#,
        )
        .bind(id.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn validate_email(email: &str) -> DomainResult<String> {
    let email = normalize_email(email);
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if valid {
        Ok(email)
    } else {
        Err(DomainError::ValidationFailed(format!(
            "Invalid email address: {email}"
        )))
    }
}

#[async_trait]
impl IdentityProvider for SqliteIdentityProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> DomainResult<AccountId> {
        let email = validate_email(email)?;
        let id = AccountId::generate();
        let hash = hash_password(password)?;

        let result = sqlx::query(
            r#"INSERT INTO accounts (id, email, display_name, password_hash, created_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(email) DO NOTHING"#,
        )
        .bind(id.as_str())
        .bind(&email)
        .bind(display_name)
        .bind(&hash)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::AccountExists(email));
        }
        self.start_session(&id).await?;
        Ok(id)
    }

    async fn sign_in(&self, email: &str, password: &str) -> DomainResult<AccountId> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT id, password_hash FROM accounts WHERE email = ?")
                .bind(normalize_email(email))
                .fetch_optional(&self.pool)
                .await?;

        let (id, hash) = row.ok_or(DomainError::InvalidCredentials)?;
        if !verify_password(password, &hash)? {
            return Err(DomainError::InvalidCredentials);
        }
        let id = AccountId::new(id);
        self.start_session(&id).await?;
        Ok(id)
    }

    async fn current_account(&self) -> DomainResult<Option<AccountId>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT account_id FROM current_session WHERE slot = 1")
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(id,)| AccountId::new(id)))
    }

    async fn sign_out(&self) -> DomainResult<()> {
        sqlx::query("DELETE FROM current_session")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn account(&self, id: &AccountId) -> DomainResult<Option<Account>> {
        let row: Option<AccountRow> = sqlx::query_as(
            "SELECT id, email, display_name, created_at FROM accounts WHERE id = ?",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: String,
    email: String,
    display_name: String,
    created_at: String,
}

impl TryFrom<AccountRow> for Account {
    type Error = DomainError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AccountId::new(row.id),
            email: row.email,
            display_name: row.display_name,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}
