use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
///
/// Job-board API keys are optional: a source whose key is empty is disabled
/// and contributes no records.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub skills_vocab_path: String,
    pub jooble_api_key: String,
    pub jsearch_api_key: String,
    /// Per-source fetch timeout for the live aggregator, in seconds.
    pub source_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            skills_vocab_path: std::env::var("SKILLS_VOCAB_PATH")
                .unwrap_or_else(|_| "data/skills_vocabulary.json".to_string()),
            jooble_api_key: std::env::var("JOOBLE_API_KEY").unwrap_or_default(),
            jsearch_api_key: std::env::var("JSEARCH_API_KEY").unwrap_or_default(),
            source_timeout_secs: std::env::var("SOURCE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse::<u64>()
                .context("SOURCE_TIMEOUT_SECS must be a positive integer")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
