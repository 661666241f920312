//! Process configuration, read once from the environment at startup and shared
//! read-only afterwards.

use std::str::FromStr;

use thiserror::Error;

mod cors;
mod database;
mod redirect;
mod server;

pub use cors::{AllowList, CorsConfig};
pub use database::DatabaseConfig;
pub use redirect::{HttpsPolicy, RedirectConfig};
pub use server::ServerConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redirect: RedirectConfig,
    pub cors: CorsConfig,
}

impl AppConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenv::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(err) if err.not_found() => {}
            Err(err) => tracing::warn!("Failed to load .env file: {}", err),
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env::new(lookup);
        Ok(Self {
            server: ServerConfig::from_env(&env)?,
            database: DatabaseConfig::from_env(&env)?,
            redirect: RedirectConfig::from_env(&env)?,
            cors: CorsConfig::from_env(&env)?,
        })
    }
}

/// Typed accessors over a variable lookup. Blank values count as unset.
pub(crate) struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn new(lookup: F) -> Self {
        Self { lookup }
    }

    pub(crate) fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    pub(crate) fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing(name))
    }

    pub(crate) fn parse_or<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(name) {
            Some(raw) => raw.parse::<T>().map_err(|err| ConfigError::Invalid {
                name,
                reason: format!("{raw:?}: {err}"),
            }),
            None => Ok(default),
        }
    }

    pub(crate) fn flag_or(&self, name: &'static str, default: bool) -> Result<bool, ConfigError> {
        let Some(raw) = self.optional(name) else {
            return Ok(default);
        };
        match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                name,
                reason: format!("{raw:?} is not a boolean"),
            }),
        }
    }
}
