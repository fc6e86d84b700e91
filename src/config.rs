//! Layered runtime configuration.
//!
//! Values are resolved from, in increasing priority: built-in defaults, an optional TOML file,
//! `CAMPUS_`-prefixed environment variables (`CAMPUS_DATABASE__URL`, `CAMPUS_SERVER__BIND`, ...),
//! and finally `DATABASE_URL`, which may come from a `.env` file.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::net::SocketAddr;
use std::path::Path;

/// The file looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "campus.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Path of the SQLite database file.
    pub url: String,
    /// Upper bound on pooled connections.
    pub pool_size: u32,
    /// How long a writer waits on a locked database before giving up.
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub bind: SocketAddr,
}

impl Settings {
    /// Loads the settings, reading `path` if given and [`DEFAULT_CONFIG_FILE`] otherwise. A missing
    /// default file is fine; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .set_default("database.url", "campus.sqlite3")?
            .set_default("database.pool_size", 8)?
            .set_default("database.busy_timeout_ms", 5000)?
            .set_default("server.bind", "127.0.0.1:5000")?
            .add_source(file)
            .add_source(Environment::with_prefix("CAMPUS").separator("__"))
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .build()?
            .try_deserialize()
    }
}
