use crate::errors::ConfigError;
use std::{env, path::PathBuf, time::Duration};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/drinks.json";
const DEFAULT_TABLE: &str = "drinks";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    File {
        path: PathBuf,
    },
    Rest {
        url: String,
        table: String,
        api_key: Option<String>,
        timeout: Option<Duration>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub store: StoreConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => parse_value("PORT", value)?,
            None => DEFAULT_PORT,
        };

        let store = match lookup("DRINKS_STORE_URL").filter(|url| !url.trim().is_empty()) {
            Some(url) => StoreConfig::Rest {
                url,
                table: lookup("DRINKS_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string()),
                api_key: lookup("DRINKS_STORE_KEY"),
                timeout: lookup("DRINKS_STORE_TIMEOUT_SECS")
                    .map(|value| parse_value("DRINKS_STORE_TIMEOUT_SECS", value))
                    .transpose()?
                    .map(Duration::from_secs),
            },
            None => StoreConfig::File {
                path: lookup("APP_DATA_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            },
        };

        Ok(Self { port, store })
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}
