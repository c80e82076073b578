use anyhow::{Context, Result};

use crate::layout::FontFamily;

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent → records live in memory for the lifetime of the process.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Default wait between a page mutation and its measurement.
    pub settle_delay_ms: u64,
    /// Extra settle waits when a renderer reports no geometry.
    pub settle_retries: u32,
    pub layout_font: FontFamily,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            port: parse_env("PORT", "8080").context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            settle_delay_ms: parse_env("SETTLE_DELAY_MS", "150")
                .context("SETTLE_DELAY_MS must be a whole number of milliseconds")?,
            settle_retries: parse_env("SETTLE_RETRIES", "1")
                .context("SETTLE_RETRIES must be a non-negative integer")?,
            layout_font: std::env::var("LAYOUT_FONT")
                .unwrap_or_else(|_| "mincho".to_string())
                .parse::<FontFamily>()
                .map_err(anyhow::Error::msg)
                .context("LAYOUT_FONT must be mincho or gothic")?,
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("invalid value '{raw}' for '{key}'"))
}
