use std::env;
use std::str::FromStr;

use dotenv::dotenv;
use log::LevelFilter;
use thiserror::Error;

use crate::store::collection_name;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    Port(#[from] std::num::ParseIntError),
    #[error("unknown STORE kind: {0}")]
    StoreKind(String),
    #[error("MONGODB_URI must be set when STORE=mongo")]
    MissingMongoUri,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StoreConfig {
    Mongo {
        uri: String,
        database: String,
        collection: String,
    },
    Memory,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: LevelFilter,
    pub store: StoreConfig,
}

impl Config {
    /// Reads `.env` if present, then the process environment.
    pub fn env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port = match lookup("PORT") {
            Some(port) => port.parse()?,
            None => 8080,
        };
        let log_level = lookup("RUST_LOG")
            .and_then(|level| LevelFilter::from_str(&level).ok())
            .unwrap_or(LevelFilter::Info);

        let store = match lookup("STORE").as_deref().unwrap_or("mongo") {
            "mongo" => StoreConfig::Mongo {
                uri: lookup("MONGODB_URI").ok_or(ConfigError::MissingMongoUri)?,
                database: lookup("MONGODB_DATABASE").unwrap_or_else(|| "dutchpay".to_owned()),
                collection: collection_name(lookup("ENV").as_deref()),
            },
            "memory" => StoreConfig::Memory,
            other => return Err(ConfigError::StoreKind(other.to_owned())),
        };

        Ok(Config {
            host,
            port,
            log_level,
            store,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_need_only_the_mongo_uri() {
        let config = config(&[("MONGODB_URI", "mongodb://localhost:27017")]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(
            config.store,
            StoreConfig::Mongo {
                uri: "mongodb://localhost:27017".to_owned(),
                database: "dutchpay".to_owned(),
                collection: "groups".to_owned(),
            }
        );
    }

    #[test]
    fn environment_suffixes_the_collection() {
        let config = config(&[("MONGODB_URI", "mongodb://db"), ("ENV", "dev")]).unwrap();
        match config.store {
            StoreConfig::Mongo { collection, .. } => assert_eq!(collection, "groups-dev"),
            StoreConfig::Memory => panic!("expected mongo store"),
        }
    }

    #[test]
    fn memory_store_and_bad_values() {
        let config = config(&[("STORE", "memory"), ("PORT", "3000"), ("RUST_LOG", "debug")]).unwrap();
        assert_eq!(config.store, StoreConfig::Memory);
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, LevelFilter::Debug);

        assert!(matches!(config_err(&[("STORE", "memory"), ("PORT", "x")]), ConfigError::Port(_)));
        assert!(matches!(config_err(&[("STORE", "dynamo")]), ConfigError::StoreKind(_)));
        assert!(matches!(config_err(&[]), ConfigError::MissingMongoUri));
    }

    fn config_err(vars: &[(&str, &str)]) -> ConfigError {
        config(vars).unwrap_err()
    }
}
