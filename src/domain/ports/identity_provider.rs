//! Identity provider port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Account, AccountId};

/// Account registration and session management.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account and sign it in.
    async fn sign_up(&self, email: &str, password: &str, display_name: &str)
        -> DomainResult<AccountId>;

    /// Verify credentials and start a session.
    async fn sign_in(&self, email: &str, password: &str) -> DomainResult<AccountId>;

    /// The signed-in account, if any.
    async fn current_account(&self) -> DomainResult<Option<AccountId>>;

    async fn sign_out(&self) -> DomainResult<()>;

    /// Look up account details.
    async fn account(&self, id: &AccountId) -> DomainResult<Option<Account>>;
}
