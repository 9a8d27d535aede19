//! Wellness tips and dietary advice.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::sync::Arc;
use tracing::warn;

use crate::adapters::llm::{ChatCompletionsClient, ChatCompletionsConfig};
use crate::cli::context::AppContext;
use crate::cli::output::progress::hidden_spinner;
use crate::cli::output::{create_spinner_with_message, output, CommandOutput};
use crate::domain::models::Config;
use crate::services::advice_service::{DIET_FALLBACK, NO_SCORES_MESSAGE, TIPS_FALLBACK};
use crate::services::{AdviceService, DIET_TOPICS};

#[derive(Args, Debug)]
pub struct AdviceArgs {
    #[command(subcommand)]
    pub command: AdviceCommands,
}

#[derive(Subcommand, Debug)]
pub enum AdviceCommands {
    /// Personalized tips from your latest screening scores
    Tips,
    /// Dietary advice on a topic
    Diet {
        /// Topic, e.g. "balanced diet" (see `advice topics`)
        topic: String,
    },
    /// List suggested dietary topics
    Topics,
}

#[derive(Debug, serde::Serialize)]
pub struct AdviceOutput {
    pub topic: Option<String>,
    pub text: String,
}

impl CommandOutput for AdviceOutput {
    fn to_human(&self) -> String {
        match &self.topic {
            Some(topic) => format!("{}\n\n{}", topic.to_uppercase(), self.text),
            None => self.text.clone(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct TopicsOutput {
    pub topics: Vec<&'static str>,
}

impl CommandOutput for TopicsOutput {
    fn to_human(&self) -> String {
        self.topics
            .iter()
            .map(|topic| format!("  • {topic}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn build_generator(config: &Config) -> Option<Arc<ChatCompletionsClient>> {
    match ChatCompletionsClient::new(ChatCompletionsConfig::from(&config.llm)) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warn!(error = %e, "text generation unavailable");
            None
        }
    }
}

pub async fn execute(args: AdviceArgs, config: &Config, json_mode: bool) -> Result<()> {
    let spinner = |message: &str| {
        if json_mode {
            hidden_spinner()
        } else {
            create_spinner_with_message(message.to_string())
        }
    };

    let result = match args.command {
        AdviceCommands::Topics => {
            output(
                &TopicsOutput {
                    topics: DIET_TOPICS.to_vec(),
                },
                json_mode,
            );
            return Ok(());
        }
        AdviceCommands::Tips => {
            let ctx = AppContext::open(config).await?;
            let account_id = ctx.require_account().await?;
            let tests = ctx.screening().results(&account_id).await?;

            let text = match build_generator(config) {
                _ if tests.is_empty() => NO_SCORES_MESSAGE.to_string(),
                Some(generator) => {
                    let progress = spinner("Generating personalized tips...");
                    let text = AdviceService::new(generator).mental_health_tips(&tests).await;
                    progress.finish_and_clear();
                    text
                }
                None => TIPS_FALLBACK.to_string(),
            };
            AdviceOutput { topic: None, text }
        }
        AdviceCommands::Diet { topic } => {
            let text = match build_generator(config) {
                Some(generator) => {
                    let progress = spinner("Getting dietary advice...");
                    let text = AdviceService::new(generator).diet_advice(&topic).await;
                    progress.finish_and_clear();
                    text
                }
                None => DIET_FALLBACK.to_string(),
            };
            AdviceOutput {
                topic: Some(topic),
                text,
            }
        }
    };

    output(&result, json_mode);
    Ok(())
}
