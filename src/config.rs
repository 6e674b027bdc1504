//! Runtime settings.
//!
//! Read from an optional `config/inventory.toml`, then overridden by environment
//! variables prefixed with `INVENTORY`, using `__` between path segments:
//!
//! ```bash
//! INVENTORY__SERVER__PORT=9000 INVENTORY__DATABASE__PATH=:memory: cargo run
//! ```
//!
//! Every key has a default, so an empty environment is a valid configuration.

use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use config::builder::DefaultState;
use serde::Deserialize;
use tracing::warn;

const CONFIG_FILE: &str = "config/inventory.toml";
const ENV_PREFIX: &str = "INVENTORY";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// SQLite file; `:memory:` keeps everything in memory.
    #[serde(default = "default_db_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RuntimeConfig {
    /// Capacity of the item actor's request channel.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_db_path() -> String {
    "inventory.db".to_string()
}

fn default_buffer_size() -> usize {
    32
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: default_db_path() }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { buffer_size: default_buffer_size() }
    }
}

impl ServerConfig {
    /// `host:port`, ready for `TcpListener::bind`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true)
}

impl Settings {
    /// Loads `config/inventory.toml` (optional) and the `INVENTORY__*` environment.
    ///
    /// A config file that exists but cannot be read is skipped with a warning.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(environment());

        match Self::from_builder(builder) {
            Ok(settings) => Ok(settings),
            Err(err) if std::path::Path::new(CONFIG_FILE).exists() => {
                warn!(file = CONFIG_FILE, error = %err, "Failed to load config file, falling back to env");
                Self::from_builder(Config::builder().add_source(environment())).map_err(|env_err| {
                    ConfigError::Message(format!(
                        "Failed to load configuration from file and env: {err}, then env-only error: {env_err}"
                    ))
                })
            }
            Err(err) => Err(err),
        }
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse(toml: &str) -> Result<Settings, ConfigError> {
        Settings::from_builder(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn empty_source_gives_defaults() {
        let settings = parse("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.server.address(), "0.0.0.0:8080");
        assert_eq!(settings.database.path, "inventory.db");
        assert_eq!(settings.runtime.buffer_size, 32);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let settings = parse(
            r#"
            [server]
            port = 9000

            [database]
            path = ":memory:"
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.database.path, ":memory:");
        assert_eq!(settings.runtime, RuntimeConfig::default());
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(parse("[server]\nport = \"not a port\"").is_err());
    }
}
