//! Mental-health screening questionnaires stored on the progress document.

use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AccountId, CurrentTest, ScreeningTest, TestRecord};
use crate::domain::ports::ProgressStore;
use crate::services::document_update::{update_progress, Mutation};

/// The question the user should answer next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingQuestion {
    pub test: ScreeningTest,
    /// 0-based.
    pub index: usize,
    pub total: usize,
    pub question: &'static str,
    pub options: &'static [&'static str],
}

impl PendingQuestion {
    fn for_current(current: &CurrentTest) -> Option<Self> {
        let questions = current.test_name.questions();
        questions
            .get(current.current_question)
            .map(|&question| Self {
                test: current.test_name,
                index: current.current_question,
                total: questions.len(),
                question,
                options: current.test_name.options(),
            })
    }
}

/// Result of answering a question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnswerOutcome {
    Next(PendingQuestion),
    Finished { test: ScreeningTest, score: f64 },
}

pub struct ScreeningService<S: ProgressStore> {
    store: Arc<S>,
    max_write_attempts: u32,
}

impl<S: ProgressStore> ScreeningService<S> {
    pub fn new(store: Arc<S>, max_write_attempts: u32) -> Self {
        Self {
            store,
            max_write_attempts,
        }
    }

    /// Start (or restart) a questionnaire.
    #[instrument(skip_all, fields(account_id = %account_id, test = %test))]
    pub async fn start(
        &self,
        account_id: &AccountId,
        test: ScreeningTest,
    ) -> DomainResult<PendingQuestion> {
        let updated = update_progress(
            self.store.as_ref(),
            account_id,
            self.max_write_attempts,
            |progress| {
                let current = CurrentTest::start(test, Utc::now());
                let pending = PendingQuestion::for_current(&current);
                progress.current_test = Some(current);
                Ok(Mutation::Write(pending))
            },
        )
        .await?;
        updated
            .value
            .ok_or_else(|| DomainError::ValidationFailed(format!("{test} has no questions")))
    }

    /// The question waiting for an answer, if a questionnaire is running.
    pub async fn pending(&self, account_id: &AccountId) -> DomainResult<Option<PendingQuestion>> {
        let stored = self
            .store
            .get(account_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(account_id.to_string()))?;
        Ok(stored
            .progress
            .current_test
            .as_ref()
            .and_then(PendingQuestion::for_current))
    }

    /// Answer the current question with the option at `option_index`.
    #[instrument(skip_all, fields(account_id = %account_id, option_index = option_index))]
    pub async fn answer(
        &self,
        account_id: &AccountId,
        option_index: usize,
    ) -> DomainResult<AnswerOutcome> {
        let updated = update_progress(
            self.store.as_ref(),
            account_id,
            self.max_write_attempts,
            |progress| {
                let mut current = progress.current_test.clone().ok_or_else(|| {
                    DomainError::ValidationFailed("No screening in progress".to_string())
                })?;
                let options = current.test_name.options();
                let answer = options.get(option_index).ok_or_else(|| {
                    DomainError::ValidationFailed(format!(
                        "Answer must be between 1 and {}",
                        options.len()
                    ))
                })?;

                current.record_answer(answer);

                if let Some(next) = PendingQuestion::for_current(&current) {
                    progress.current_test = Some(current);
                    return Ok(Mutation::Write(AnswerOutcome::Next(next)));
                }

                let test = current.test_name;
                let score = test.score_percentage(current.answers.values());
                let record = TestRecord::record(
                    progress.mental_health_tests.get(test.as_str()),
                    score,
                    Utc::now(),
                );
                progress
                    .mental_health_tests
                    .insert(test.as_str().to_string(), record);
                progress.current_test = None;
                Ok(Mutation::Write(AnswerOutcome::Finished { test, score }))
            },
        )
        .await?;

        if let AnswerOutcome::Finished { test, score } = &updated.value {
            info!(account_id = %account_id, test = %test, score, "screening completed");
        }
        Ok(updated.value)
    }

    /// Latest results per questionnaire.
    pub async fn results(
        &self,
        account_id: &AccountId,
    ) -> DomainResult<BTreeMap<String, TestRecord>> {
        let stored = self
            .store
            .get(account_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(account_id.to_string()))?;
        Ok(stored.progress.mental_health_tests)
    }
}
