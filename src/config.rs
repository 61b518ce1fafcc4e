use crate::errors::ConfigError;
use crate::rate_limit::RateLimitConfig;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_SEED_PATH: &str = "data/catalog.ron";

pub const ENV_DATABASE_URL: &str = "POKEDEX_DATABASE_URL";
pub const ENV_SEED_PATH: &str = "POKEDEX_SEED_PATH";
pub const ENV_RATE_WINDOW_MS: &str = "POKEDEX_RATE_WINDOW_MS";
pub const ENV_RATE_MAX_REQUESTS: &str = "POKEDEX_RATE_MAX_REQUESTS";

/// Runtime settings shared by the CLI and the MCP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokedexConfig {
    /// SQLite URL; `None` means an in-memory catalog filled from `seed_path`
    pub database_url: Option<String>,
    pub seed_path: PathBuf,
    pub rate_limit: RateLimitConfig,
}

impl Default for PokedexConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            seed_path: PathBuf::from(DEFAULT_SEED_PATH),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl PokedexConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds the config from any variable source; unset or blank values
    /// fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let window_ms = match get(ENV_RATE_WINDOW_MS) {
            Some(value) => parse_positive(ENV_RATE_WINDOW_MS, &value)?,
            None => defaults.rate_limit.window_ms,
        };
        let max_requests = match get(ENV_RATE_MAX_REQUESTS) {
            Some(value) => parse_positive(ENV_RATE_MAX_REQUESTS, &value)?,
            None => defaults.rate_limit.max_requests,
        };

        Ok(Self {
            database_url: get(ENV_DATABASE_URL),
            seed_path: get(ENV_SEED_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.seed_path),
            rate_limit: RateLimitConfig {
                window_ms,
                max_requests,
            },
        })
    }
}

fn parse_positive<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(parsed) if parsed > T::default() => Ok(parsed),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            expected: "a positive integer",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<PokedexConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PokedexConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, PokedexConfig::default());
        assert_eq!(config.rate_limit.window_ms, 60_000);
        assert_eq!(config.rate_limit.max_requests, 60);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            (ENV_DATABASE_URL, "sqlite://pokedex.db"),
            (ENV_SEED_PATH, "/tmp/seed.ron"),
            (ENV_RATE_WINDOW_MS, "1000"),
            (ENV_RATE_MAX_REQUESTS, " 5 "),
        ])
        .unwrap();
        assert_eq!(config.database_url.as_deref(), Some("sqlite://pokedex.db"));
        assert_eq!(config.seed_path, PathBuf::from("/tmp/seed.ron"));
        assert_eq!(config.rate_limit.window_ms, 1000);
        assert_eq!(config.rate_limit.max_requests, 5);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config_from(&[(ENV_DATABASE_URL, "  ")]).unwrap();
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn test_invalid_numbers_name_the_variable() {
        let err = config_from(&[(ENV_RATE_MAX_REQUESTS, "0")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                var: ENV_RATE_MAX_REQUESTS,
                value: "0".to_string(),
                expected: "a positive integer",
            }
        );
        assert!(config_from(&[(ENV_RATE_WINDOW_MS, "soon")]).is_err());
    }
}
