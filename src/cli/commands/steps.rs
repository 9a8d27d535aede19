//! Step and distance commands.

use anyhow::Result;
use chrono::Utc;
use clap::{Args, Subcommand};
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::sensors::ManualStepSensor;
use crate::cli::context::AppContext;
use crate::cli::output::{output, CommandOutput};
use crate::domain::errors::DomainError;
use crate::domain::models::{AccountId, Config, StepReading};
use crate::services::{record_reading, StepSummary, TrackingSession};

#[derive(Args, Debug)]
pub struct StepsArgs {
    #[command(subcommand)]
    pub command: StepsCommands,
}

#[derive(Subcommand, Debug)]
pub enum StepsCommands {
    /// Show today's steps and distance
    Show,
    /// Record cumulative step and distance counts for today
    Record {
        /// Steps taken today
        steps: u64,
        /// Distance covered today, in meters
        #[arg(short, long, default_value_t = 0.0)]
        distance: f64,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct StepsOutput {
    #[serde(flatten)]
    pub summary: StepSummary,
}

impl CommandOutput for StepsOutput {
    fn to_human(&self) -> String {
        let s = &self.summary;
        format!(
            "Steps: {}\nDistance: {:.1} m of {:.0} m goal ({:.0}%)",
            s.steps,
            s.distance_m,
            s.goal_m,
            s.goal_ratio * 100.0
        )
    }
}

/// Push one reading through a tracking session so it is stored the same way
/// a live sensor's readings are.
async fn record_through_session(
    ctx: &AppContext,
    account_id: AccountId,
    steps: u64,
    distance: f64,
) -> Result<()> {
    let reading = StepReading::new(steps, distance, Utc::now());
    if reading.steps == 0 && reading.distance_m <= 0.0 {
        // Identical to the session's initial value, so it would never publish.
        record_reading(ctx.store.as_ref(), &account_id, &reading).await?;
        return Ok(());
    }

    let sensor = Arc::new(ManualStepSensor::with_reading(reading.steps, reading.distance_m));
    let session = TrackingSession::start(account_id, sensor, ctx.store.clone(), &ctx.config.steps);
    let mut readings = session.subscribe();
    let wait = Duration::from_millis(ctx.config.steps.poll_interval_ms.saturating_mul(5).max(1000));
    let published = tokio::time::timeout(wait, readings.changed()).await;
    session.stop().await;

    match published {
        Ok(Ok(())) => Ok(()),
        _ => Err(DomainError::RemoteUnavailable(
            "step reading was not recorded in time".to_string(),
        )
        .into()),
    }
}

pub async fn execute(args: StepsArgs, config: &Config, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open(config).await?;
    let account_id = ctx.require_account().await?;

    if let StepsCommands::Record { steps, distance } = args.command {
        record_through_session(&ctx, account_id.clone(), steps, distance.max(0.0)).await?;
    }

    let progress = ctx.progression().snapshot(&account_id).await?.progress;
    let summary = StepSummary::from_progress(&progress, config.steps.distance_goal_m);
    output(&StepsOutput { summary }, json_mode);
    Ok(())
}
