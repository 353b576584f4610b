//! Process settings read from the environment (after `.env` is loaded).

use std::{env, str::FromStr};

use thiserror::Error;

use crate::{constants, utils::logger::LogFormat};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),
}

/// Which storage collaborator backs the routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub db_pool_size: u32,
    /// Base URL the self-test harness calls; `None` means the bound loopback port.
    pub self_test_base_url: Option<String>,
    pub log_format: LogFormat,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = read(constants::ENV_HOST).unwrap_or_else(|| constants::DEFAULT_HOST.to_string());
        let port = parse_or(constants::ENV_PORT, read(constants::ENV_PORT), constants::DEFAULT_PORT)?;
        let database_url = read(constants::ENV_DATABASE_URL);

        let default_storage = if database_url.is_some() {
            StorageBackend::Postgres
        } else {
            StorageBackend::Memory
        };
        let storage = parse_or(
            constants::ENV_STORAGE_BACKEND,
            read(constants::ENV_STORAGE_BACKEND),
            default_storage,
        )?;
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingEnv(constants::ENV_DATABASE_URL));
        }

        let db_pool_size = parse_or(
            constants::ENV_DB_POOL_SIZE,
            read(constants::ENV_DB_POOL_SIZE),
            constants::DEFAULT_DB_POOL_SIZE,
        )?;
        if db_pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: constants::ENV_DB_POOL_SIZE,
                value: "0".to_string(),
                reason: "pool size must be at least 1".to_string(),
            });
        }

        let log_format = parse_or(
            constants::ENV_LOG_FORMAT,
            read(constants::ENV_LOG_FORMAT),
            LogFormat::Text,
        )?;

        Ok(Settings {
            host,
            port,
            storage,
            database_url,
            db_pool_size,
            self_test_base_url: read(constants::ENV_SELF_TEST_BASE_URL)
                .map(|url| url.trim_end_matches('/').to_string()),
            log_format,
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}
