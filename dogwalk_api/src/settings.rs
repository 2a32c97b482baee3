use anyhow::Context;
use config::{Config, Environment};
use serde::Deserialize;

use crate::walk_repository::PostgresWalkRepositoryConfig;

/// Process configuration, every field comes from the upper-cased env variable of the same name
///
/// Values stay strings until deserialization, numeric and boolean fields are
/// converted there so string fields are never reformatted.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub http_host: String,
    pub http_port: u16,
    pub use_in_memory_db: bool,
    pub db_host: String,
    pub db_port: u16,
    pub db_username: String,
    pub db_password: String,
    pub db_name: String,
    pub db_pool_max_size: u32,
    /// Comma separated, empty means any origin
    pub cors_allow_origins: String,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_environment(Environment::default())
    }

    fn from_environment(environment: Environment) -> anyhow::Result<Self> {
        Config::builder()
            .set_default("http_host", "0.0.0.0")?
            .set_default("http_port", 8080)?
            .set_default("use_in_memory_db", false)?
            .set_default("db_host", "127.0.0.1")?
            .set_default("db_port", 5432)?
            .set_default("db_username", "postgres")?
            .set_default("db_password", "postgres")?
            .set_default("db_name", "postgres")?
            .set_default("db_pool_max_size", 10)?
            .set_default("cors_allow_origins", "")?
            .add_source(environment)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Origins of the CORS allow-list, empty when any origin is allowed
    pub fn cors_origins(&self) -> Vec<String> {
        let origins: Vec<String> = self
            .cors_allow_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        if origins.iter().any(|origin| origin == "*") {
            vec![]
        } else {
            origins
        }
    }

    pub fn postgres_config(&self) -> PostgresWalkRepositoryConfig {
        PostgresWalkRepositoryConfig {
            hostname: self.db_host.clone(),
            port: self.db_port,
            username: self.db_username.clone(),
            password: self.db_password.clone(),
            dbname: self.db_name.clone(),
            pool_max_size: self.db_pool_max_size,
        }
    }

    pub fn log_startup(&self) {
        tracing::info!("Listening on {}:{}", self.http_host, self.http_port);
        if self.use_in_memory_db {
            tracing::info!("Using in-memory datastore");
        } else {
            tracing::info!(
                "Using postgres at {}:{}/{} (pool size {})",
                self.db_host,
                self.db_port,
                self.db_name,
                self.db_pool_max_size
            );
        }
        match self.cors_origins().as_slice() {
            [] => tracing::info!("CORS allows any origin"),
            origins => tracing::info!("CORS allows {}", origins.join(", ")),
        }
    }
}
