use log::LevelFilter;
use std::str::FromStr;

pub const PORT: &str = "PORT";
pub const HOST: &str = "HOST";
pub const DATABASE_PATH: &str = "DATABASE_PATH";
pub const LOGGING_LEVEL: &str = "LOGGING_LEVEL";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_DATABASE_PATH: &str = "banco_do_jogo.db";

/// Process configuration, read once from the environment at start-up
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub logging_level: LevelFilter,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source, falling back to
    /// defaults for anything unset or unparsable
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup(PORT)
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let host = lookup(HOST).unwrap_or_else(|| DEFAULT_HOST.into());
        let database_path =
            lookup(DATABASE_PATH).unwrap_or_else(|| DEFAULT_DATABASE_PATH.into());
        let logging_level = lookup(LOGGING_LEVEL)
            .and_then(|level| LevelFilter::from_str(&level).ok())
            .unwrap_or(LevelFilter::Info);

        Config {
            host,
            port,
            database_path,
            logging_level,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
