//! Text-generation service port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Free-form completion used for tips and advice.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> DomainResult<String>;
}
