//! Application configuration

use std::env;

use crate::routing::DEFAULT_BYPASS_PREFIXES;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,
    pub public_url: String,
    pub max_request_body_bytes: usize,

    // Database (None = in-memory store)
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub run_migrations: bool,

    // Routing
    pub router_bypass_prefixes: Vec<String>,

    // Development
    pub enable_dev_seed: bool,
    pub seed_on_startup: bool,

    // Logging
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            public_url: "http://localhost:3000".to_string(),
            max_request_body_bytes: 1_048_576,
            database_url: None,
            database_max_connections: 5,
            run_migrations: true,
            router_bypass_prefixes: DEFAULT_BYPASS_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            enable_dev_seed: false,
            seed_on_startup: false,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());
        if let Some(url) = &database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(ConfigError::Invalid(
                    "DATABASE_URL",
                    "must be a postgres:// or postgresql:// URL",
                ));
            }
        }

        let seed_on_startup = parse_bool("SEED_ON_STARTUP", defaults.seed_on_startup)?;
        let enable_dev_seed = parse_bool("ENABLE_DEV_SEED", defaults.enable_dev_seed)?;

        Ok(Self {
            // Server
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            public_url: env::var("PUBLIC_URL").unwrap_or(defaults.public_url),
            max_request_body_bytes: parse_number(
                "MAX_REQUEST_BODY_BYTES",
                defaults.max_request_body_bytes,
            )?,

            // Database
            database_url,
            database_max_connections: parse_number(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            run_migrations: parse_bool("RUN_MIGRATIONS", defaults.run_migrations)?,

            // Routing
            router_bypass_prefixes: match env::var("ROUTER_BYPASS_PREFIXES") {
                Ok(raw) => parse_prefixes(&raw)?,
                Err(_) => defaults.router_bypass_prefixes,
            },

            // Development
            enable_dev_seed,
            seed_on_startup,

            // Logging
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                Ok("pretty") | Err(_) => LogFormat::Pretty,
                Ok(_) => {
                    return Err(ConfigError::Invalid(
                        "LOG_FORMAT",
                        "must be either 'json' or 'pretty'",
                    ))
                }
            },
        })
    }

    /// Whether data lives in process memory rather than PostgreSQL
    pub fn uses_memory_store(&self) -> bool {
        self.database_url.is_none()
    }
}

fn parse_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(raw) => match raw.to_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ConfigError::Invalid(name, "must be true/false or 1/0")),
        },
        Err(_) => Ok(default),
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, "must be a positive integer")),
        Err(_) => Ok(default),
    }
}

/// Comma-separated path prefixes; each must start with `/`
fn parse_prefixes(raw: &str) -> Result<Vec<String>, ConfigError> {
    let prefixes: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    if prefixes.iter().any(|p| !p.starts_with('/')) {
        return Err(ConfigError::Invalid(
            "ROUTER_BYPASS_PREFIXES",
            "every prefix must start with '/'",
        ));
    }
    Ok(prefixes)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    Invalid(&'static str, &'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "BIND_ADDRESS",
        "PUBLIC_URL",
        "MAX_REQUEST_BODY_BYTES",
        "DATABASE_URL",
        "DATABASE_MAX_CONNECTIONS",
        "RUN_MIGRATIONS",
        "ROUTER_BYPASS_PREFIXES",
        "ENABLE_DEV_SEED",
        "SEED_ON_STARTUP",
        "LOG_FORMAT",
    ];

    /// Helper to clear env vars before and after tests
    fn cleanup_config() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_use_memory_store() {
        cleanup_config();

        let config = Config::from_env().unwrap();
        assert!(config.uses_memory_store());
        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert_eq!(config.database_max_connections, 5);
        assert!(!config.enable_dev_seed);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(
            config.router_bypass_prefixes,
            vec!["/static/".to_string(), "/favicon.ico".to_string()]
        );
    }

    #[test]
    #[serial]
    fn test_overrides() {
        cleanup_config();
        env::set_var("DATABASE_URL", "postgres://localhost/tenantkit");
        env::set_var("DATABASE_MAX_CONNECTIONS", "12");
        env::set_var("ENABLE_DEV_SEED", "1");
        env::set_var("LOG_FORMAT", "json");
        env::set_var("ROUTER_BYPASS_PREFIXES", "/assets/, /_build/ ,");

        let config = Config::from_env().unwrap();
        assert!(!config.uses_memory_store());
        assert_eq!(config.database_max_connections, 12);
        assert!(config.enable_dev_seed);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.router_bypass_prefixes,
            vec!["/assets/".to_string(), "/_build/".to_string()]
        );

        cleanup_config();
    }

    #[test]
    #[serial]
    fn test_invalid_values_rejected() {
        cleanup_config();

        env::set_var("DATABASE_URL", "mysql://localhost/db");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("DATABASE_URL", _))
        ));
        env::remove_var("DATABASE_URL");

        env::set_var("DATABASE_MAX_CONNECTIONS", "lots");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS", _))
        ));
        env::remove_var("DATABASE_MAX_CONNECTIONS");

        env::set_var("SEED_ON_STARTUP", "yes please");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("SEED_ON_STARTUP", _))
        ));
        env::remove_var("SEED_ON_STARTUP");

        env::set_var("ROUTER_BYPASS_PREFIXES", "static/");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("ROUTER_BYPASS_PREFIXES", _))
        ));

        cleanup_config();
    }
}
