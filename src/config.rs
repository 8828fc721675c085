use std::env;

use anyhow::{anyhow, Context, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub statsd: Option<StatsdConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsdConfig {
    pub host: String,
    pub port: u16,
    pub prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| anyhow!("{} must be set", key));

        let port = match lookup("PORT") {
            Some(port) => port.parse::<u16>().with_context(|| format!("invalid PORT: {}", port))?,
            None => 8090,
        };

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(size) => size
                .parse::<u32>()
                .with_context(|| format!("invalid DB_MAX_CONNECTIONS: {}", size))?,
            None => 5,
        };

        let statsd = match lookup("STATSD_HOST") {
            Some(host) => {
                let port = required("STATSD_PORT")?;
                Some(StatsdConfig {
                    host,
                    port: port
                        .parse::<u16>()
                        .with_context(|| format!("invalid STATSD_PORT: {}", port))?,
                    prefix: lookup("STATSD_PREFIX").unwrap_or_else(|| "hotel_reservation".to_string()),
                })
            }
            None => None,
        };

        Ok(Self {
            database_url: required("DBCONNSTRING")?,
            jwt_secret: required("JWT_SECRET")?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            max_connections,
            statsd,
        })
    }
}
