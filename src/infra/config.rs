//! Centralized configuration (environment variables + defaults).

use anyhow::{anyhow, Context, Result};
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Database URL must be provided (no default) for safety.
    pub database_url: String,
    pub max_connections: u32,
    /// Run `CREATE TABLE IF NOT EXISTS students` at startup.
    pub ensure_table: bool,
}

impl ServerConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;

        let host = match get("SERVER_HOST") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("SERVER_HOST must be an IP address, got '{}'", v))?,
            None => DEFAULT_HOST.parse()?,
        };
        let port = parse_or(get("SERVER_PORT"), "SERVER_PORT", DEFAULT_PORT)?;
        let max_connections = parse_or(
            get("DB_MAX_CONNECTIONS"),
            "DB_MAX_CONNECTIONS",
            DEFAULT_MAX_CONNECTIONS,
        )?
        .max(1);
        let ensure_table = match get("STUDENTS_ENSURE_TABLE") {
            Some(v) => parse_bool(&v)
                .ok_or_else(|| anyhow!("STUDENTS_ENSURE_TABLE must be true or false, got '{}'", v))?,
            None => true,
        };

        Ok(Self {
            host,
            port,
            database_url,
            max_connections,
            ensure_table,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value '{}'", key, v)),
        None => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
