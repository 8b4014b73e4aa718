use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub bind_addr: String,
    pub pg_database_url: String,
    pub pg_workers: usize,
}

impl Settings {
    /// Reads settings from the process environment (after dotenv has run).
    /// `PG_DATABASE_URL` is mandatory, the rest has defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_addr", "127.0.0.1:8080")?
            .set_default("pg_workers", 5_i64)?
            .add_source(Environment::default())
            .build()?
            .try_deserialize()
    }
}
