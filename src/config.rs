//! Configuration loaded from environment variables.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Limit/offset pagination settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub media_root: PathBuf,
    /// Prefix prepended to stored media paths; always ends with `/`.
    pub media_url: String,
    pub pagination: PaginationConfig,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let mut media_url = lookup("MEDIA_URL").unwrap_or_else(|| "/media/".to_owned());
        if !media_url.ends_with('/') {
            media_url.push('/');
        }

        let defaults = PaginationConfig::default();
        let pagination = PaginationConfig {
            default_limit: parse_or(&lookup, "PAGE_SIZE", defaults.default_limit)?,
            max_limit: parse_or(&lookup, "MAX_PAGE_SIZE", defaults.max_limit)?,
        };
        if pagination.default_limit == 0 || pagination.default_limit > pagination.max_limit {
            return Err(ConfigError::Invalid {
                key: "PAGE_SIZE",
                value: pagination.default_limit.to_string(),
            });
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_owned()),
            jwt_secret: required("JWT_SECRET")?,
            media_root: PathBuf::from(lookup("MEDIA_ROOT").unwrap_or_else(|| "media".to_owned())),
            media_url,
            pagination,
            run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", true)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_required_vars_are_set() {
        let config = load(&[("DATABASE_URL", "sqlite::memory:"), ("JWT_SECRET", "s")]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.media_url, "/media/");
        assert_eq!(config.pagination, PaginationConfig::default());
        assert!(config.run_migrations);
    }

    #[test]
    fn missing_secret_is_reported() {
        let err = load(&[("DATABASE_URL", "sqlite::memory:")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn media_url_gets_trailing_slash() {
        let config = load(&[
            ("DATABASE_URL", "x"),
            ("JWT_SECRET", "s"),
            ("MEDIA_URL", "https://cdn.example.com/m"),
        ])
        .unwrap();
        assert_eq!(config.media_url, "https://cdn.example.com/m/");
    }

    #[test]
    fn page_size_must_fit_under_max() {
        let err = load(&[
            ("DATABASE_URL", "x"),
            ("JWT_SECRET", "s"),
            ("PAGE_SIZE", "500"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PAGE_SIZE", .. }));

        let err = load(&[
            ("DATABASE_URL", "x"),
            ("JWT_SECRET", "s"),
            ("RUN_MIGRATIONS", "maybe"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "RUN_MIGRATIONS", .. }));
    }
}
