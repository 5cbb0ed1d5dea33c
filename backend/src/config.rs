//! Runtime configuration read from `SURVEYS_*` environment variables.

use log::info;
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// Maximum accepted JSON body, in bytes.
    pub json_limit: usize,
    /// How long a revoked token stays in the blacklist.
    pub token_ttl: Duration,
    pub blacklist_sweep_interval: Duration,
    /// Editor account ensured at startup, if any.
    pub bootstrap_user: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            host: try_load(&lookup, "SURVEYS_HOST", "127.0.0.1")?,
            port: try_load(&lookup, "SURVEYS_PORT", "8080")?,
            database_path: try_load(&lookup, "SURVEYS_DATABASE", "surveys.sqlite")?,
            json_limit: try_load(&lookup, "SURVEYS_JSON_LIMIT", "10485760")?,
            token_ttl: Duration::from_secs(try_load(
                &lookup,
                "SURVEYS_TOKEN_TTL_SECS",
                "86400",
            )?),
            blacklist_sweep_interval: Duration::from_secs(positive(try_load(
                &lookup,
                "SURVEYS_BLACKLIST_SWEEP_SECS",
                "3600",
            )?)?),
            bootstrap_user: lookup("SURVEYS_BOOTSTRAP_USER")
                .map(|email| email.trim().to_string())
                .filter(|email| !email.is_empty()),
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.clone(),
        reason: e.to_string(),
    })
}

fn positive(secs: u64) -> Result<u64, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Invalid {
            key: "SURVEYS_BLACKLIST_SWEEP_SECS",
            value: secs.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn falls_back_to_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, PathBuf::from("surveys.sqlite"));
        assert_eq!(config.json_limit, 10 * 1024 * 1024);
        assert_eq!(config.token_ttl, Duration::from_secs(86400));
        assert!(config.bootstrap_user.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("SURVEYS_PORT", "9090"),
            ("SURVEYS_DATABASE", "/tmp/x.sqlite"),
            ("SURVEYS_BOOTSTRAP_USER", " manager@example.com "),
        ])
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.database_path, PathBuf::from("/tmp/x.sqlite"));
        assert_eq!(config.bootstrap_user.as_deref(), Some("manager@example.com"));
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(matches!(
            config_from(&[("SURVEYS_PORT", "eighty")]),
            Err(ConfigError::Invalid { key: "SURVEYS_PORT", .. })
        ));
        assert!(config_from(&[("SURVEYS_BLACKLIST_SWEEP_SECS", "0")]).is_err());
    }
}
