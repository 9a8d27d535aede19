//! Account CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::context::AppContext;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub command: AccountCommands,
}

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Create an account and sign in
    Signup {
        /// Email address
        email: String,
        /// Display name shown on the leaderboard
        #[arg(short, long)]
        name: String,
        /// Password (at least 6 characters)
        #[arg(short, long, env = "UPLIFTXP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in to an existing account
    Login {
        /// Email address
        email: String,
        /// Password
        #[arg(short, long, env = "UPLIFTXP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in account
    Whoami,
}

#[derive(Debug, serde::Serialize)]
pub struct AccountOutput {
    pub success: bool,
    pub message: String,
    pub account_id: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl AccountOutput {
    fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            account_id: None,
            email: None,
            display_name: None,
        }
    }
}

impl CommandOutput for AccountOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if let Some(name) = &self.display_name {
            lines.push(format!("Name: {name}"));
        }
        if let Some(email) = &self.email {
            lines.push(format!("Email: {email}"));
        }
        if let Some(id) = &self.account_id {
            lines.push(format!("ID: {id}"));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: AccountArgs, config: &Config, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open(config).await?;
    let accounts = ctx.accounts();

    let result = match args.command {
        AccountCommands::Signup {
            email,
            name,
            password,
        } => {
            let id = accounts.sign_up(&email, &password, &name).await?;
            AccountOutput {
                account_id: Some(id.to_string()),
                display_name: Some(name.trim().to_string()),
                ..AccountOutput::message(format!("Welcome, {}! You are signed in.", name.trim()))
            }
        }
        AccountCommands::Login { email, password } => {
            let id = accounts.sign_in(&email, &password).await?;
            AccountOutput {
                account_id: Some(id.to_string()),
                ..AccountOutput::message("Signed in.")
            }
        }
        AccountCommands::Logout => {
            accounts.sign_out().await?;
            AccountOutput::message("Signed out.")
        }
        AccountCommands::Whoami => {
            let account = accounts.whoami().await?;
            AccountOutput {
                account_id: Some(account.id.to_string()),
                email: Some(account.email),
                display_name: Some(account.display_name),
                ..AccountOutput::message("Signed in as:")
            }
        }
    };

    output(&result, json_mode);
    Ok(())
}
