//! Command-line interface.

pub mod commands;
pub mod context;
pub mod output;
pub mod types;

use console::style;
use serde_json::json;

use crate::domain::errors::DomainError;
use crate::domain::models::Config;

pub use context::AppContext;
pub use types::{Cli, Commands};

/// Run the parsed command.
pub async fn run(cli: Cli, config: &Config) -> anyhow::Result<()> {
    let json_mode = cli.json;
    match cli.command {
        Commands::Init(args) => commands::init::execute(args, config, json_mode).await,
        Commands::Account(args) => commands::account::execute(args, config, json_mode).await,
        Commands::Tasks(args) => commands::tasks::execute(args, config, json_mode).await,
        Commands::Progress(args) => commands::progress::execute(args, config, json_mode).await,
        Commands::Leaderboard(args) => {
            commands::leaderboard::execute(args, config, json_mode).await
        }
        Commands::Screening(args) => commands::screening::execute(args, config, json_mode).await,
        Commands::Advice(args) => commands::advice::execute(args, config, json_mode).await,
        Commands::Steps(args) => commands::steps::execute(args, config, json_mode).await,
    }
}

/// Exit status for a failed command; `0` for the silent no-op errors.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<DomainError>() {
        Some(e) if e.is_silent() => 0,
        _ => 1,
    }
}

/// Print an error for the user and exit.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let code = exit_code(&err);
    let silent = code == 0;

    if json_mode {
        let body = json!({
            "success": silent,
            "error": err.to_string(),
            "details": err.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else if silent {
        println!("No change: {err}");
    } else {
        eprintln!("{} {err}", style("Error:").red().bold());
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
        if matches!(err.downcast_ref::<DomainError>(), Some(DomainError::AuthRequired)) {
            eprintln!("Sign in with: upliftxp account login <EMAIL>");
        }
    }
    std::process::exit(code)
}
