use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 3002;
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_AGENT_API_URL: &str = "http://localhost:8001";

/// Application configuration loaded from environment variables.
/// Fails at startup if `DATABASE_URL` is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    /// Public base URL of this service.
    pub core_api_url: String,
    pub agent_api_url: String,
    pub agent_timeout_secs: u64,
    pub agent_max_retries: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let port = parse_env("PORT", DEFAULT_PORT)?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10)?,
            port,
            allowed_origins: parse_origins(
                &std::env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGIN.into()),
            ),
            core_api_url: std::env::var("CORE_API_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}/api/v1")),
            agent_api_url: std::env::var("AGENT_API_URL")
                .unwrap_or_else(|_| DEFAULT_AGENT_API_URL.to_string()),
            agent_timeout_secs: parse_env("AGENT_TIMEOUT_SECS", 60)?,
            agent_max_retries: parse_env("AGENT_MAX_RETRIES", 2)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
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
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Splits a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
