use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables.
/// Fails at startup if the backend base URL is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub http_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::load(None, None)
    }

    /// Like [`Config::from_env`], with command-line values taking precedence
    /// over the environment.
    pub fn load(base_url: Option<String>, token: Option<String>) -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let api_base_url = match base_url {
            Some(url) => url,
            None => require_env("SCORECARD_API_BASE_URL")?,
        };
        let api_token = token
            .or_else(|| std::env::var("SCORECARD_API_TOKEN").ok())
            .filter(|t| !t.trim().is_empty());
        let timeout_secs = match std::env::var("SCORECARD_HTTP_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            api_base_url,
            api_token,
            http_timeout: Duration::from_secs(timeout_secs),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_timeout(raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .context("SCORECARD_HTTP_TIMEOUT_SECS must be a whole number of seconds")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_values_take_precedence() {
        let cfg = Config::load(
            Some("https://scoring.internal/api".to_string()),
            Some("tok".to_string()),
        )
        .unwrap();
        assert_eq!(cfg.api_base_url, "https://scoring.internal/api");
        assert_eq!(cfg.api_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_blank_token_is_treated_as_absent() {
        let cfg = Config::load(Some("http://localhost:4000".to_string()), Some("  ".to_string()))
            .unwrap();
        assert!(cfg.api_token.is_none());
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout(" 45 ").unwrap(), 45);
        assert!(parse_timeout("soon").is_err());
    }
}
