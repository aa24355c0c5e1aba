use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://items.db";

const ENV_PREFIX: &str = "ITEMS";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub conn_string: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub max_connections: Option<u32>,
    #[serde(default)]
    pub min_connections: Option<u32>,
}

impl DatabaseConfig {
    pub fn db_type(&self) -> Option<DbType> {
        let url = self.connection_string();
        if url.starts_with("sqlite://") {
            Some(DbType::Sqlite)
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Some(DbType::Postgres)
        } else {
            None
        }
    }

    pub fn connection_string(&self) -> String {
        if let Some(ref url) = self.url {
            url.clone()
        } else if let Some(ref conn) = self.conn_string {
            conn.clone()
        } else if let Some(ref file) = self.filename {
            format!("sqlite://{}", file)
        } else {
            DEFAULT_DATABASE_URL.to_string()
        }
    }

    pub fn sqlite_path(&self) -> Option<String> {
        match self.db_type() {
            Some(DbType::Sqlite) => {
                let url = self.connection_string();
                Some(url.strip_prefix("sqlite://").unwrap_or(&url).to_string())
            }
            _ => None,
        }
    }

    pub fn max_connections(&self) -> u32 {
        match self.db_type() {
            Some(DbType::Sqlite) => 1,
            _ => self.max_connections.unwrap_or(10),
        }
    }

    pub fn min_connections(&self) -> u32 {
        match self.db_type() {
            Some(DbType::Sqlite) => 1,
            _ => self.min_connections.unwrap_or(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbType {
    Postgres,
    Sqlite,
}

impl Config {
    /// Loads the YAML file at `path` (if present), then layers `ITEMS__*`
    /// environment variables and `DATABASE_URL` on top. Validation is left to
    /// the caller so command-line overrides can be applied first.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::build(path.as_ref(), Some(environment()))?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn build(path: &Path, env: Option<config::Environment>) -> Result<Self, ConfigError> {
        let mut builder =
            config::Config::builder().add_source(config::File::from(path).required(false));

        if let Some(env) = env {
            builder = builder.add_source(env);
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("DATABASE_URL").filter(|value| !value.is_empty()) {
            self.database.url = Some(value);
        }
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

fn default_port() -> u16 {
    8000
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
