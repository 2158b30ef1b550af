use log::LevelFilter;
use std::str::FromStr;

pub const API_URL: &str = "MEMORY_API_URL";
pub const LOGGING_LEVEL: &str = "LOGGING_LEVEL";

const DEFAULT_API_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub logging_level: LevelFilter,
}

impl Config {
    pub fn from_env() -> Self {
        let api_url = std::env::var(API_URL).unwrap_or_else(|_| DEFAULT_API_URL.into());
        // Logs share the terminal with the board, so only warnings by default
        let logging_level = std::env::var(LOGGING_LEVEL)
            .ok()
            .and_then(|level| LevelFilter::from_str(&level).ok())
            .unwrap_or(LevelFilter::Warn);

        Config {
            api_url,
            logging_level,
        }
    }
}
