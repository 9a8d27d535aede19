//! Scripted text generator for tests and offline use.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::TextGenerator;

#[derive(Debug)]
enum Reply {
    Text(String),
    Fail,
}

/// Returns a fixed reply (or a fixed failure) and records every prompt.
#[derive(Debug)]
pub struct MockTextGenerator {
    reply: Reply,
    prompts: Mutex<Vec<String>>,
}

impl MockTextGenerator {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Reply::Text(text.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Reply::Fail,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn complete(&self, prompt: &str) -> DomainResult<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail => Err(DomainError::RemoteUnavailable(
                "mock generator failure".to_string(),
            )),
        }
    }
}
