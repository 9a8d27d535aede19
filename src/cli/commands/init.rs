//! Implementation of the `upliftxp init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::adapters::sqlite::{initialize_database, PoolConfig};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::{ConfigLoader, CONFIG_DIR};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force reinitialization even if already initialized
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub initialized_path: PathBuf,
    pub config_path: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if let Some(config) = &self.config_path {
            lines.push(format!("\nConfiguration written to {}", config.display()));
        }
        if let Some(db) = &self.database_path {
            lines.push(format!("Database initialized at {}", db.display()));
        }
        lines.join("\n")
    }
}

fn database_path(target: &Path, config: &Config) -> PathBuf {
    let path = config
        .database
        .path
        .strip_prefix("sqlite:")
        .unwrap_or(&config.database.path);
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        target.join(path)
    }
}

pub async fn execute(args: InitArgs, config: &Config, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };
    let config_dir = target_path.join(CONFIG_DIR);

    if config_dir.exists() && !args.force {
        let output_data = InitOutput {
            success: false,
            message: "Project already initialized. Use --force to reinitialize.".to_string(),
            initialized_path: target_path,
            config_path: None,
            database_path: None,
        };
        output(&output_data, json_mode);
        return Ok(());
    }

    if args.force && config_dir.exists() {
        fs::remove_dir_all(&config_dir)
            .await
            .with_context(|| format!("Failed to remove existing {}", config_dir.display()))?;
    }

    let config_path = ConfigLoader::write_default(&target_path)?;

    let db_path = database_path(&target_path, config);
    let db_url = format!("sqlite:{}", db_path.display());
    initialize_database(&db_url, Some(PoolConfig::from(&config.database)))
        .await
        .context("Failed to initialize database")?;

    let output_data = InitOutput {
        success: true,
        message: if args.force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        initialized_path: target_path,
        config_path: Some(config_path),
        database_path: Some(db_path),
    };
    output(&output_data, json_mode);
    Ok(())
}
