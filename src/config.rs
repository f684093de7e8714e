use std::{env, path::PathBuf, str::FromStr};

use anyhow::{Context, Result, bail};
use chrono::TimeDelta;
use dotenvy::dotenv;

/// Upper bound for `TOKEN_TTL`: one year.
const MAX_TOKEN_TTL: usize = 366 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub token_ttl: usize,
    pub api_prefix: String,

    // Attendance rules
    pub duplicate_window_secs: i64,
    pub history_default_limit: usize,
    pub page_default_limit: usize,
    pub max_page_size: usize,
    pub enforce_token_subject: bool,
    pub strict_clinic_match: bool,

    // Rate limiting
    pub rate_limit_enabled: bool,
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub staff_seed_path: Option<PathBuf>,
    pub log_dir: String,
    pub log_level: tracing::Level,
}

fn var_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".to_string());

        let config = Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string()),
            jwt_secret,
            token_ttl: var_or("TOKEN_TTL", 86_400)?, // default 24h
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            duplicate_window_secs: var_or("DUPLICATE_WINDOW_SECS", 300)?,
            history_default_limit: var_or("HISTORY_DEFAULT_LIMIT", 10)?,
            page_default_limit: var_or("PAGE_DEFAULT_LIMIT", 50)?,
            max_page_size: var_or("MAX_PAGE_SIZE", 100)?,
            enforce_token_subject: var_or("ENFORCE_TOKEN_SUBJECT", true)?,
            strict_clinic_match: var_or("STRICT_CLINIC_MATCH", false)?,

            rate_limit_enabled: var_or("RATE_LIMIT_ENABLED", true)?,
            rate_login_per_min: var_or("RATE_LOGIN_PER_MIN", 60)?,
            rate_protected_per_min: var_or("RATE_PROTECTED_PER_MIN", 1000)?,

            staff_seed_path: env::var("STAFF_SEED_PATH").ok().map(PathBuf::from),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: log_level
                .parse()
                .with_context(|| format!("LOG_LEVEL has an invalid value: {log_level:?}"))?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.duplicate_window_secs < 0 {
            bail!("DUPLICATE_WINDOW_SECS must not be negative");
        }
        if TimeDelta::try_seconds(self.duplicate_window_secs).is_none() {
            bail!(
                "DUPLICATE_WINDOW_SECS is out of range: {}",
                self.duplicate_window_secs
            );
        }
        if self.token_ttl == 0 || self.token_ttl > MAX_TOKEN_TTL {
            bail!("TOKEN_TTL must be between 1 and {MAX_TOKEN_TTL} seconds");
        }
        if self.max_page_size == 0 {
            bail!("MAX_PAGE_SIZE must be at least 1");
        }
        if self.rate_login_per_min == 0 || self.rate_protected_per_min == 0 {
            bail!("rate limits must be at least 1 request per minute");
        }
        Ok(())
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            server_addr: "127.0.0.1:0".to_string(),
            jwt_secret: "test-secret".to_string(),
            token_ttl: 86_400,
            api_prefix: "/api".to_string(),
            duplicate_window_secs: 300,
            history_default_limit: 10,
            page_default_limit: 50,
            max_page_size: 100,
            enforce_token_subject: true,
            strict_clinic_match: false,
            rate_limit_enabled: false,
            rate_login_per_min: 60,
            rate_protected_per_min: 1000,
            staff_seed_path: None,
            log_dir: "logs".to_string(),
            log_level: tracing::Level::DEBUG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_is_valid() {
        assert!(Config::for_tests().validate().is_ok());
    }

    #[test]
    fn huge_duplicate_window_is_rejected() {
        let config = Config {
            duplicate_window_secs: i64::MAX,
            ..Config::for_tests()
        };
        assert!(config.validate().is_err());

        let config = Config {
            duplicate_window_secs: -1,
            ..Config::for_tests()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn token_ttl_must_be_positive_and_bounded() {
        for token_ttl in [0, MAX_TOKEN_TTL + 1, usize::MAX] {
            let config = Config {
                token_ttl,
                ..Config::for_tests()
            };
            assert!(config.validate().is_err(), "accepted TOKEN_TTL={token_ttl}");
        }

        let config = Config {
            token_ttl: MAX_TOKEN_TTL,
            ..Config::for_tests()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_rate_is_rejected() {
        let config = Config {
            rate_login_per_min: 0,
            ..Config::for_tests()
        };
        assert!(config.validate().is_err());
    }
}
