use serde::{Deserialize, Serialize};

/// Main configuration structure for upliftxp
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Progression engine tuning
    #[serde(default)]
    pub progression: ProgressionConfig,

    /// Text-generation service used for tips and advice
    #[serde(default)]
    pub llm: LlmConfig,

    /// Step tracking
    #[serde(default)]
    pub steps: StepsConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".upliftxp/upliftxp.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// `sqlx` connection URL for the configured path.
    pub fn url(&self) -> String {
        if self.path.starts_with("sqlite:") {
            self.path.clone()
        } else {
            format!("sqlite:{}", self.path)
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// Rotation for file output: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Progression engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProgressionConfig {
    /// Reset the streak to 0 when a day's tasks were not all completed
    #[serde(default)]
    pub reset_streak_on_miss: bool,

    /// Read-modify-write attempts before a write is reported as conflicting
    #[serde(default = "default_max_write_attempts")]
    pub max_write_attempts: u32,

    /// Entries shown on the leaderboard
    #[serde(default = "default_leaderboard_limit")]
    pub leaderboard_limit: u32,
}

const fn default_max_write_attempts() -> u32 {
    5
}

const fn default_leaderboard_limit() -> u32 {
    100
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            reset_streak_on_miss: false,
            max_write_attempts: default_max_write_attempts(),
            leaderboard_limit: default_leaderboard_limit(),
        }
    }
}

/// OpenAI-compatible chat completions service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LlmConfig {
    /// Base URL, without the `/chat/completions` suffix
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Model to use
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API key (can also be set via UPLIFTXP_LLM_API_KEY)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Retries on transient failures
    #[serde(default = "default_llm_max_retries")]
    pub max_retries: u32,
}

fn default_llm_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_llm_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

const fn default_llm_timeout() -> u64 {
    30
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_max_tokens() -> u32 {
    500
}

const fn default_llm_max_retries() -> u32 {
    2
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            api_key: None,
            timeout_secs: default_llm_timeout(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_retries: default_llm_max_retries(),
        }
    }
}

/// Step tracking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StepsConfig {
    /// Sensor polling interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Daily distance goal in meters
    #[serde(default = "default_distance_goal_m")]
    pub distance_goal_m: f64,
}

const fn default_poll_interval_ms() -> u64 {
    1000
}

const fn default_distance_goal_m() -> f64 {
    20.0
}

impl Default for StepsConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            distance_goal_m: default_distance_goal_m(),
        }
    }
}
