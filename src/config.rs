use config::{ConfigError, Environment};
use serde::{Deserialize, Serialize};
use std::env;

/// Fallback embedded store, used when no DATABASE_URL is configured
pub const EMBEDDED_DATABASE_URL: &str = "sqlite://jar_ledger.db?mode=rwc";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.workers", 2)?
            .set_default("database.url", EMBEDDED_DATABASE_URL)?
            .set_default("database.max_connections", 5)?;

        // Override with environment variables
        builder = builder.add_source(
            Environment::with_prefix("JAR_LEDGER").separator("__"),
        );

        // Special handling for common env vars
        if let Ok(db_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", db_url)?;
        }

        if let Ok(port) = env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port cannot be 0".to_string());
        }

        if self.database.url.is_empty() {
            return Err("Database URL is required".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_embedded_store() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                workers: 2,
            },
            database: DatabaseConfig {
                url: EMBEDDED_DATABASE_URL.to_string(),
                max_connections: 5,
            },
        };

        assert!(config.validate().is_ok());
        assert!(config.database.url.starts_with("sqlite:"));
    }

    #[test]
    fn zero_port_is_rejected() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 0,
                workers: 2,
            },
            database: DatabaseConfig {
                url: EMBEDDED_DATABASE_URL.to_string(),
                max_connections: 5,
            },
        };

        assert!(config.validate().is_err());
    }
}
