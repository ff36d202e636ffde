use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variables honoured on top of the `GATEWAY__*` namespace, mapped to
/// their configuration keys.
const LEGACY_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("MONGO_CONNECTION_STRING", "database.connection_string"),
    ("MONGO_DB_NAME", "database.name"),
    ("MONGO_COLLECTION_NAME", "database.collection"),
    ("MONGO_SEARCH_INDEX_NAME", "database.search_index"),
    ("MONGO_AUTOCOMPLETE_INDEX_NAME", "database.autocomplete_index"),
    ("MONGO_TLS_CA_FILE", "database.tls_ca_file"),
];

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

/// Export the variables of a `.env` file into the process environment.
///
/// Without a path, `.env` is searched for from the working directory upwards.
/// Variables already set in the environment win. Returns the file that was read.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|_| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    match loaded {
        Ok(path) => Some(path),
        Err(e) if e.not_found() => None,
        Err(e) => {
            eprintln!("Ignoring unreadable env file: {}", e);
            None
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/gateway.toml".to_string());
        Self::load_with(&config_path, |key| std::env::var(key).ok())
    }

    /// Load configuration from an explicit file path, resolving the `MONGO_*`
    /// overrides through `lookup`.
    pub fn load_with<F>(config_path: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(config_path).required(false))
            // Override with environment variables (prefix: GATEWAY)
            .add_source(
                config::Environment::with_prefix("GATEWAY")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in LEGACY_ENV_OVERRIDES {
            builder = builder.set_override_option(*key, lookup(var))?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the gateway cannot start with
    pub fn validate(&self) -> Result<()> {
        self.database.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// MongoDB connection string; there is no default
    pub connection_string: Option<String>,

    /// Database name
    #[serde(default = "default_database_name")]
    pub name: String,

    /// Collection holding person records
    #[serde(default = "default_collection_name")]
    pub collection: String,

    /// Atlas Search index used for relevance search
    #[serde(default = "default_search_index")]
    pub search_index: String,

    /// Atlas Search index used for autocomplete
    #[serde(default = "default_autocomplete_index")]
    pub autocomplete_index: String,

    /// CA bundle used to verify the server certificate
    pub tls_ca_file: Option<PathBuf>,

    /// Application name reported to the server
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        match self.connection_string.as_deref() {
            Some(uri) if !uri.trim().is_empty() => {}
            _ => {
                return Err(AppError::Configuration(
                    "database connection string is required (set MONGO_CONNECTION_STRING)"
                        .to_string(),
                ))
            }
        }

        let names = [
            ("database.name", &self.name),
            ("database.collection", &self.collection),
            ("database.search_index", &self.search_index),
            ("database.autocomplete_index", &self.autocomplete_index),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(AppError::Configuration(format!("{key} must not be empty")));
            }
        }

        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
            name: default_database_name(),
            collection: default_collection_name(),
            search_index: default_search_index(),
            autocomplete_index: default_autocomplete_index(),
            tls_ca_file: None,
            app_name: default_app_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub prometheus_enabled: bool,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8000
}

fn default_database_name() -> String {
    "search".to_string()
}

fn default_collection_name() -> String {
    "person".to_string()
}

fn default_search_index() -> String {
    "personNamePhone".to_string()
}

fn default_autocomplete_index() -> String {
    "personNamesAutocomplete".to_string()
}

fn default_app_name() -> String {
    "person-search-gateway".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}
