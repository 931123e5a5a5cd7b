use anyhow::{bail, Context, Result};

use crate::matching::selector::SelectorBackend;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    /// Retries for transport errors and 5xx only. 0 disables automatic retry.
    pub llm_max_retries: u32,
    pub matcher_backend: SelectorBackend,
    pub database_url: String,
    pub typst_bin: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_model: env_or("OPENAI_MODEL", "gpt-3.5-turbo"),
            openai_base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            llm_max_retries: env_or("LLM_MAX_RETRIES", "0")
                .parse::<u32>()
                .context("LLM_MAX_RETRIES must be a non-negative integer")?,
            matcher_backend: parse_backend(&env_or("MATCHER_BACKEND", "llm"))?,
            database_url: env_or("DATABASE_URL", "sqlite://resume_tailor.db?mode=rwc"),
            typst_bin: env_or("TYPST_BIN", "typst"),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_backend(value: &str) -> Result<SelectorBackend> {
    match value.trim().to_ascii_lowercase().as_str() {
        "llm" => Ok(SelectorBackend::Llm),
        "keyword" => Ok(SelectorBackend::Keyword),
        other => bail!("MATCHER_BACKEND must be 'llm' or 'keyword', got '{other}'"),
    }
}
