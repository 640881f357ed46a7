use std::{env, fmt::Display, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

use crate::matcher::DEFAULT_EXCLUDED;

pub const DEFAULT_UPSTREAM_URL: &str = "http://127.0.0.1:3001";
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value: {reason}")]
    Invalid { key: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upstream_url: String,
    pub backend_url: String,
    pub guard_exclude: Vec<String>,
    pub upstream_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let guard_exclude: String = try_load(&lookup, "GUARD_EXCLUDE", &DEFAULT_EXCLUDED.join(","))?;

        Ok(Self {
            port: try_load(&lookup, "RUST_PORT", "3000")?,
            upstream_url: try_load(&lookup, "UPSTREAM_URL", DEFAULT_UPSTREAM_URL)?,
            backend_url: try_load(&lookup, "BACKEND_URL", DEFAULT_BACKEND_URL)?,
            guard_exclude: split_list(&guard_exclude),
            upstream_timeout: Duration::from_millis(try_load(
                &lookup,
                "UPSTREAM_TIMEOUT_MS",
                "10000",
            )?),
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .trim()
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");

            ConfigError::Invalid {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration};

    use super::{Config, ConfigError, split_list};

    fn config_with(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        Config::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.upstream_url, "http://127.0.0.1:3001");
        assert_eq!(config.backend_url, "http://127.0.0.1:8000");
        assert_eq!(
            config.guard_exclude,
            ["api", "_next/static", "_next/image", "favicon.ico"]
        );
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[
            ("RUST_PORT", " 8080 "),
            ("UPSTREAM_URL", "http://frontend:3000"),
            ("GUARD_EXCLUDE", "api, static ,,robots.txt"),
            ("UPSTREAM_TIMEOUT_MS", "250"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.upstream_url, "http://frontend:3000");
        assert_eq!(config.guard_exclude, ["api", "static", "robots.txt"]);
        assert_eq!(config.upstream_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_port() {
        let error = config_with(&[("RUST_PORT", "eighty")]).unwrap_err();

        assert!(matches!(error, ConfigError::Invalid { ref key, .. } if key == "RUST_PORT"));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(""), Vec::<String>::new());
        assert_eq!(split_list(" a ,b"), ["a", "b"]);
    }
}
