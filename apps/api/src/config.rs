use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Which `ReadinessScorer` backend the service evaluates scores with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessBackend {
    /// Evaluate locally against the skill ledger in Postgres.
    Ledger,
    /// Call the hosted backend's `calculate_readiness_score` procedure.
    Rpc,
}

impl FromStr for ReadinessBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ledger" => Ok(ReadinessBackend::Ledger),
            "rpc" => Ok(ReadinessBackend::Rpc),
            other => bail!("READINESS_BACKEND must be 'ledger' or 'rpc', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub jwt_secret: String,
    pub readiness_backend: ReadinessBackend,
    /// Base URL of the hosted backend; required when `readiness_backend` is `Rpc`.
    pub backend_url: Option<String>,
    pub backend_service_key: Option<String>,
    pub catalog_seed_enabled: bool,
    pub submit_lock_ttl_ms: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let readiness_backend = optional_env("READINESS_BACKEND")
            .map(|v| v.parse::<ReadinessBackend>())
            .transpose()?
            .unwrap_or(ReadinessBackend::Ledger);

        let backend_url = optional_env("BACKEND_URL");
        let backend_service_key = optional_env("BACKEND_SERVICE_KEY");
        if readiness_backend == ReadinessBackend::Rpc
            && (backend_url.is_none() || backend_service_key.is_none())
        {
            bail!("BACKEND_URL and BACKEND_SERVICE_KEY are required when READINESS_BACKEND=rpc");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            jwt_secret: require_env("JWT_SECRET")?,
            readiness_backend,
            backend_url,
            backend_service_key,
            catalog_seed_enabled: parse_bool(
                optional_env("CATALOG_SEED_ENABLED").as_deref(),
                true,
            )?,
            submit_lock_ttl_ms: optional_env("SUBMIT_LOCK_TTL_MS")
                .unwrap_or_else(|| "10000".to_string())
                .parse::<u64>()
                .context("SUBMIT_LOCK_TTL_MS must be a positive integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(value: Option<&str>, default: bool) -> Result<bool> {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => bail!("expected a boolean, got '{v}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_backend_parses_case_insensitively() {
        assert_eq!("Ledger".parse::<ReadinessBackend>().unwrap(), ReadinessBackend::Ledger);
        assert_eq!(" rpc ".parse::<ReadinessBackend>().unwrap(), ReadinessBackend::Rpc);
        assert!("graphql".parse::<ReadinessBackend>().is_err());
    }

    #[test]
    fn test_parse_bool_default_and_values() {
        assert!(parse_bool(None, true).unwrap());
        assert!(!parse_bool(Some("off"), true).unwrap());
        assert!(parse_bool(Some("YES"), false).unwrap());
        assert!(parse_bool(Some("maybe"), false).is_err());
    }
}
