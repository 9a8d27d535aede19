//! Mental-health screening CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::collections::BTreeMap;

use crate::cli::context::AppContext;
use crate::cli::output::{output, CommandOutput};
use crate::domain::errors::DomainError;
use crate::domain::models::{Config, ScreeningTest, TestRecord};
use crate::services::{AnswerOutcome, PendingQuestion};

#[derive(Args, Debug)]
pub struct ScreeningArgs {
    #[command(subcommand)]
    pub command: ScreeningCommands,
}

#[derive(Subcommand, Debug)]
pub enum ScreeningCommands {
    /// List available questionnaires
    List,
    /// Start a questionnaire (depression, anxiety, adhd, ptsd)
    Start {
        /// Questionnaire name
        test: String,
    },
    /// Answer the current question with option number N (1-based)
    Answer {
        /// Option number
        #[arg(value_parser = clap::value_parser!(u16).range(1..))]
        option: u16,
    },
    /// Show latest scores
    Results,
}

#[derive(Debug, serde::Serialize)]
pub struct TestSummary {
    pub name: &'static str,
    pub title: &'static str,
    pub questions: usize,
    pub max_score: u32,
}

#[derive(Debug, serde::Serialize)]
pub struct TestListOutput {
    pub tests: Vec<TestSummary>,
}

impl CommandOutput for TestListOutput {
    fn to_human(&self) -> String {
        let mut lines = vec!["Available questionnaires:".to_string()];
        for test in &self.tests {
            lines.push(format!(
                "  {:<11} {} ({} questions)",
                test.name, test.title, test.questions
            ));
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct QuestionOutput {
    #[serde(flatten)]
    pub outcome: AnswerOutcome,
}

fn render_question(question: &PendingQuestion) -> String {
    let mut lines = vec![format!(
        "{} - question {}/{}",
        question.test.title(),
        question.index + 1,
        question.total
    )];
    lines.push(question.question.to_string());
    for (i, option) in question.options.iter().enumerate() {
        lines.push(format!("  {}. {option}", i + 1));
    }
    lines.push("Answer with: upliftxp screening answer <N>".to_string());
    lines.join("\n")
}

impl CommandOutput for QuestionOutput {
    fn to_human(&self) -> String {
        match &self.outcome {
            AnswerOutcome::Next(question) => render_question(question),
            AnswerOutcome::Finished { test, score } => {
                format!("{} complete. Score: {score:.0}%", test.title())
            }
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ResultsOutput {
    pub results: BTreeMap<String, TestRecord>,
}

impl CommandOutput for ResultsOutput {
    fn to_human(&self) -> String {
        if self.results.is_empty() {
            return "No screening results yet.".to_string();
        }
        let mut lines = vec!["Latest results:".to_string()];
        for (name, record) in &self.results {
            let title = ScreeningTest::from_str(name).map_or(name.as_str(), |test| test.title());
            lines.push(format!(
                "  {title}: {:.0}% (taken {}, {} attempt(s))",
                record.last_score,
                record.last_taken.format("%Y-%m-%d"),
                record.history.len()
            ));
        }
        lines.join("\n")
    }
}

fn parse_test(name: &str) -> Result<ScreeningTest, DomainError> {
    ScreeningTest::from_str(name).ok_or_else(|| {
        DomainError::ValidationFailed(format!(
            "Unknown questionnaire '{name}'. Choose one of: depression, anxiety, adhd, ptsd"
        ))
    })
}

pub async fn execute(args: ScreeningArgs, config: &Config, json_mode: bool) -> Result<()> {
    if matches!(args.command, ScreeningCommands::List) {
        let tests = ScreeningTest::ALL
            .iter()
            .map(|test| TestSummary {
                name: test.as_str(),
                title: test.title(),
                questions: test.questions().len(),
                max_score: test.max_score(),
            })
            .collect();
        output(&TestListOutput { tests }, json_mode);
        return Ok(());
    }

    let ctx = AppContext::open(config).await?;
    let account_id = ctx.require_account().await?;
    let screening = ctx.screening();

    match args.command {
        ScreeningCommands::List => {}
        ScreeningCommands::Start { test } => {
            let question = screening.start(&account_id, parse_test(&test)?).await?;
            let outcome = AnswerOutcome::Next(question);
            output(&QuestionOutput { outcome }, json_mode);
        }
        ScreeningCommands::Answer { option } => {
            let outcome = screening
                .answer(&account_id, usize::from(option) - 1)
                .await?;
            output(&QuestionOutput { outcome }, json_mode);
        }
        ScreeningCommands::Results => {
            let results = screening.results(&account_id).await?;
            output(&ResultsOutput { results }, json_mode);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_test() {
        assert_eq!(parse_test("anxiety").unwrap(), ScreeningTest::Anxiety);
        assert!(matches!(
            parse_test("mood"),
            Err(DomainError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_render_question_is_numbered() {
        let question = PendingQuestion {
            test: ScreeningTest::Anxiety,
            index: 0,
            total: 7,
            question: ScreeningTest::Anxiety.questions()[0],
            options: ScreeningTest::Anxiety.options(),
        };
        let rendered = render_question(&question);
        assert!(rendered.contains("question 1/7"));
        assert!(rendered.contains("  1. "));
    }
}
