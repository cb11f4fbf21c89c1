//! Runtime configuration loaded from the environment (and `.env` if present).

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Server settings
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Upper bound on a single payment gateway call
    pub payment_timeout: Duration,
    /// Latency of the simulated payment gateway
    pub payment_delay: Duration,
    /// Wizard sessions idle longer than this are dropped
    pub session_idle: Duration,
    pub session_capacity: u64,
    /// Mark new accounts verified on sign-up
    pub auto_verify_signups: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            payment_timeout: Duration::from_secs(30),
            payment_delay: Duration::from_millis(3000),
            session_idle: Duration::from_secs(30 * 60),
            session_capacity: 10_000,
            auto_verify_signups: true,
        }
    }
}

impl Config {
    /// Load from the process environment, falling back to defaults for unset keys
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_addr = parse(&lookup, "BIND_ADDR")?.unwrap_or(defaults.bind_addr);
        let payment_timeout = parse::<u64, _>(&lookup, "PAYMENT_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.payment_timeout);
        if payment_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                key: "PAYMENT_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let payment_delay = parse::<u64, _>(&lookup, "PAYMENT_DELAY_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.payment_delay);
        let session_idle = match parse::<u64, _>(&lookup, "SESSION_IDLE_MINUTES")? {
            Some(minutes) => idle_minutes(minutes)?,
            None => defaults.session_idle,
        };
        let session_capacity =
            parse(&lookup, "SESSION_CAPACITY")?.unwrap_or(defaults.session_capacity);
        let auto_verify_signups =
            parse(&lookup, "AUTO_VERIFY_SIGNUPS")?.unwrap_or(defaults.auto_verify_signups);

        Ok(Self {
            bind_addr,
            payment_timeout,
            payment_delay,
            session_idle,
            session_capacity,
            auto_verify_signups,
        })
    }
}

fn idle_minutes(minutes: u64) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        key: "SESSION_IDLE_MINUTES",
        value: minutes.to_string(),
        reason: reason.to_string(),
    };
    if minutes == 0 {
        return Err(invalid("must be at least 1"));
    }
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| invalid("too large"))
}

fn parse<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                key,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}
