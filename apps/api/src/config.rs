use anyhow::{Context, Result};

const DEFAULT_OLLAMA_API_BASE: &str = "http://localhost:10010";
const DEFAULT_MODEL_NAME: &str = "gemma3:270m";

/// Application configuration loaded from environment variables.
/// Built once at startup and handed to every component through `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub llm: LlmConfig,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

/// Where the completion model lives and how long a single call may take.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_base: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", 10)?,
            llm: LlmConfig {
                api_base: env_or("OLLAMA_API_BASE", DEFAULT_OLLAMA_API_BASE),
                model: env_or("GEMMA_MODEL_NAME", DEFAULT_MODEL_NAME),
                timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            },
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            port: parse_env("PORT", 8080)?,
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

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid value, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
