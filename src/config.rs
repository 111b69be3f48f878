use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::store::ListingOrder;

#[derive(Debug, Error)]
#[error("invalid value '{value}' for {var}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Parse `var` if set, otherwise use `default`.
fn env_or<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError {
            var,
            value: raw,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Redis { url: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub backend: Backend,
    pub listing_order: ListingOrder,
    pub frontend_url: Option<String>,
}

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let default_store = if cfg!(feature = "redis-store") { "redis" } else { "memory" };
        let store = env::var("ADS_STORE").unwrap_or_else(|_| default_store.to_string());
        let backend = match store.to_ascii_lowercase().as_str() {
            "memory" => Backend::Memory,
            "redis" => Backend::Redis {
                url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            },
            _ => {
                return Err(ConfigError {
                    var: "ADS_STORE",
                    value: store,
                    reason: "expected memory or redis".into(),
                })
            }
        };
        Ok(Self {
            bind_addr: env::var("ADS_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_or("ADS_PORT", 8080)?,
            backend,
            listing_order: env_or("ADS_LISTING_ORDER", ListingOrder::default())?,
            frontend_url: env::var("FRONTEND_URL").ok().filter(|s| !s.is_empty()),
        })
    }
}
