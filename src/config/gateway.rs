//! Process configuration read from the environment (and `.env` when present).

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::time::Duration;

/// Checked in order; the first non-blank value wins.
const DATABASE_URL_KEYS: [&str; 3] = ["GATEWAY_DATABASE_URL", "DATABASE_URL", "PROTOSVR_DB_URL"];
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_MS: u64 = 5_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
    /// From `GATEWAY_DATABASE_URL`, else `DATABASE_URL`, else `PROTOSVR_DB_URL`.
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Server-side `statement_timeout`; unset leaves the database default.
    pub statement_timeout: Option<Duration>,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = DATABASE_URL_KEYS
            .iter()
            .find_map(|key| get(key))
            .ok_or(ConfigError::MissingDatabaseUrl(DATABASE_URL_KEYS[0]))?;

        let bind_raw = get("GATEWAY_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            key: "GATEWAY_BIND_ADDR",
            value: bind_raw.clone(),
            reason: e.to_string(),
        })?;

        let max_connections = match get("GATEWAY_MAX_CONNECTIONS") {
            Some(v) => parse_number::<u32>("GATEWAY_MAX_CONNECTIONS", &v)?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "GATEWAY_MAX_CONNECTIONS",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }

        let acquire_timeout = match get("GATEWAY_ACQUIRE_TIMEOUT_MS") {
            Some(v) => Duration::from_millis(parse_number("GATEWAY_ACQUIRE_TIMEOUT_MS", &v)?),
            None => Duration::from_millis(DEFAULT_ACQUIRE_TIMEOUT_MS),
        };

        let statement_timeout = get("GATEWAY_STATEMENT_TIMEOUT_MS")
            .map(|v| parse_number("GATEWAY_STATEMENT_TIMEOUT_MS", &v).map(Duration::from_millis))
            .transpose()?
            .filter(|d| !d.is_zero());

        Ok(GatewayConfig {
            database_url,
            bind_addr,
            max_connections,
            acquire_timeout,
            statement_timeout,
        })
    }
}

fn parse_number<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
