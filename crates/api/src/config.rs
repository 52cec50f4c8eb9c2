//! Runtime configuration, read from the environment at startup.

use std::net::{Ipv4Addr, SocketAddr};

use chrono::{Duration, Utc};
use thiserror::Error;

use stockroom_auth::DEFAULT_COST;
use stockroom_inventory::DEFAULT_LOW_STOCK_THRESHOLD;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid value for {key}: {value:?} ({reason})")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    /// Quantities strictly below this are reported as low stock.
    pub low_stock_threshold: i64,
    pub bcrypt_cost: u32,
    pub seed_demo_data: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            bcrypt_cost: DEFAULT_COST,
            seed_demo_data: true,
        }
    }
}

impl core::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("token_ttl", &self.token_ttl)
            .field("low_stock_threshold", &self.low_stock_threshold)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("seed_demo_data", &self.seed_demo_data)
            .finish_non_exhaustive()
    }
}

fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError {
        key,
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_number<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| invalid(key, value, e.to_string()))
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup("PORT") {
            let port: u16 = parse_number("PORT", &v)?;
            config.bind_addr.set_port(port);
        }

        match lookup("JWT_SECRET") {
            Some(v) if !v.trim().is_empty() => config.jwt_secret = v,
            Some(v) => return Err(invalid("JWT_SECRET", &v, "must not be empty")),
            None => tracing::warn!("JWT_SECRET not set; using insecure dev default"),
        }

        if let Some(v) = lookup("TOKEN_TTL_SECS") {
            let secs: i64 = parse_number("TOKEN_TTL_SECS", &v)?;
            if secs <= 0 {
                return Err(invalid("TOKEN_TTL_SECS", &v, "must be positive"));
            }
            let ttl = Duration::try_seconds(secs)
                .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
                .ok_or_else(|| invalid("TOKEN_TTL_SECS", &v, "token expiry out of range"))?;
            config.token_ttl = ttl;
        }

        if let Some(v) = lookup("LOW_STOCK_THRESHOLD") {
            let threshold: i64 = parse_number("LOW_STOCK_THRESHOLD", &v)?;
            if threshold < 0 {
                return Err(invalid("LOW_STOCK_THRESHOLD", &v, "must not be negative"));
            }
            config.low_stock_threshold = threshold;
        }

        if let Some(v) = lookup("BCRYPT_COST") {
            let cost: u32 = parse_number("BCRYPT_COST", &v)?;
            if !(4..=31).contains(&cost) {
                return Err(invalid("BCRYPT_COST", &v, "must be between 4 and 31"));
            }
            config.bcrypt_cost = cost;
        }

        if let Some(v) = lookup("SEED_DEMO_DATA") {
            config.seed_demo_data = parse_flag("SEED_DEMO_DATA", &v)?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_addr.port(), 5000);
        assert_eq!(config.token_ttl, Duration::hours(24));
        assert_eq!(config.low_stock_threshold, 5);
        assert_eq!(config.bcrypt_cost, 10);
        assert!(config.seed_demo_data);
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = load(&[
            ("PORT", "8081"),
            ("JWT_SECRET", "s3cret"),
            ("TOKEN_TTL_SECS", "60"),
            ("LOW_STOCK_THRESHOLD", "3"),
            ("BCRYPT_COST", "4"),
            ("SEED_DEMO_DATA", "false"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8081);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.token_ttl, Duration::seconds(60));
        assert_eq!(config.low_stock_threshold, 3);
        assert_eq!(config.bcrypt_cost, 4);
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert_eq!(load(&[("PORT", "http")]).unwrap_err().key, "PORT");
        assert_eq!(load(&[("TOKEN_TTL_SECS", "0")]).unwrap_err().key, "TOKEN_TTL_SECS");
        assert_eq!(
            load(&[("TOKEN_TTL_SECS", "9223372036854775807")]).unwrap_err().key,
            "TOKEN_TTL_SECS"
        );
        assert_eq!(load(&[("BCRYPT_COST", "2")]).unwrap_err().key, "BCRYPT_COST");
        assert_eq!(load(&[("SEED_DEMO_DATA", "maybe")]).unwrap_err().key, "SEED_DEMO_DATA");
        assert_eq!(load(&[("JWT_SECRET", "  ")]).unwrap_err().key, "JWT_SECRET");
    }

    #[test]
    fn ttl_must_leave_a_representable_expiry() {
        // Fits in a Duration, but now + ttl is past the last representable instant.
        let err = load(&[("TOKEN_TTL_SECS", "9000000000000")]).unwrap_err();
        assert_eq!(err.key, "TOKEN_TTL_SECS");
        assert_eq!(err.reason, "token expiry out of range");

        let config = load(&[("TOKEN_TTL_SECS", "31536000")]).unwrap();
        assert_eq!(config.token_ttl, Duration::days(365));
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let config = load(&[("JWT_SECRET", "top-secret-value")]).unwrap();
        assert!(!format!("{config:?}").contains("top-secret-value"));
    }
}
