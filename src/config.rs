use std::env;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://Resources/hawaii.sqlite";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: parse_var("SERVER_PORT", 8080)?,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 5)?,
            db_acquire_timeout_secs: parse_var("DB_ACQUIRE_TIMEOUT_SECS", 30)?,
        })
    }

    /// Configuration pointing at a specific database, defaults elsewhere
    pub fn for_database(database_url: impl Into<String>) -> Self {
        Config {
            database_url: database_url.into(),
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            db_max_connections: 5,
            db_acquire_timeout_secs: 30,
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "DATABASE_URL",
        "SERVER_HOST",
        "SERVER_PORT",
        "DB_MAX_CONNECTIONS",
        "DB_ACQUIRE_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = Config::from_env().unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.db_acquire_timeout_secs, 30);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        env::set_var("DATABASE_URL", "sqlite:///tmp/climate.sqlite");
        env::set_var("SERVER_HOST", "127.0.0.1");
        env::set_var("SERVER_PORT", "5000");
        env::set_var("DB_MAX_CONNECTIONS", "2");

        let config = Config::from_env().unwrap();
        clear_env();

        assert_eq!(config.database_url, "sqlite:///tmp/climate.sqlite");
        assert_eq!(config.server_addr(), "127.0.0.1:5000");
        assert_eq!(config.db_max_connections, 2);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_port() {
        clear_env();
        env::set_var("SERVER_PORT", "eighty");

        let result = Config::from_env();
        clear_env();

        match result {
            Err(ConfigError::InvalidValue { name, value }) => {
                assert_eq!(name, "SERVER_PORT");
                assert_eq!(value, "eighty");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }
}
