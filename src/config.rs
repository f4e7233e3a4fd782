//! Service configuration loaded from environment variables.
//!
//! ## Required
//! - `DB_HOST` - database server host
//! - `DB_NAME` - database name
//! - `DB_USER` - database role
//! - `DB_PASSWORD` - database password
//!
//! ## Optional
//! - `DB_PORT` - database port (default: 5432)
//! - `HOST` - bind address (default: 0.0.0.0)
//! - `PORT` - listen port (default: 3000)

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgConnectOptions;
use std::{
    env::var,
    net::{IpAddr, SocketAddr},
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub name: String,
    pub user: String,
    /// Redacted in `Debug` output
    pub password: SecretString,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub host: IpAddr,
    pub port: u16,
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };
        let or_default = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let database = DatabaseConfig {
            host: required("DB_HOST")?,
            name: required("DB_NAME")?,
            user: required("DB_USER")?,
            password: SecretString::from(required("DB_PASSWORD")?),
            port: parse("DB_PORT", &or_default("DB_PORT", "5432"))?,
        };

        Ok(Self {
            database,
            host: parse("HOST", &or_default("HOST", "0.0.0.0"))?,
            port: parse("PORT", &or_default("PORT", "3000"))?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(self.password.expose_secret())
            .database(&self.name)
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
