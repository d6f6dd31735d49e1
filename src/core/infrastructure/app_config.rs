//! Runtime settings read from the environment (and an optional `.env` file).

use super::{
    client_config::{ClientConfig, RateLimitConfig},
    retry_policy::RetryPolicy,
};
use crate::core::domain::{
    error::{ProxmoxError, ProxmoxResult},
    value_object::{DEFAULT_PORT, DEFAULT_REALM},
};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CREDENTIALS_FILE: &str = "proxmox_credentials.json";

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub credentials_path: PathBuf,
    pub port: u16,
    pub default_realm: String,
    pub secure: bool,
    pub accept_invalid_certs: bool,
    pub request_timeout: Duration,
    pub retry_attempts: u32,
    pub rate_limit_rps: Option<u32>,
    /// Overrides the per-command log file.
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
            port: DEFAULT_PORT,
            default_realm: DEFAULT_REALM.to_string(),
            secure: true,
            accept_invalid_certs: true,
            request_timeout: Duration::from_secs(15),
            retry_attempts: 3,
            rate_limit_rps: None,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads `PVE_*` variables.
    pub fn from_env() -> ProxmoxResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    /// `ProxmoxError::Configuration` for values that do not parse.
    pub fn from_lookup<F>(lookup: F) -> ProxmoxResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let timeout_secs: u64 = parse_var(&lookup, "PVE_TIMEOUT_SECS")?
            .unwrap_or(defaults.request_timeout.as_secs());

        Ok(Self {
            credentials_path: lookup("PVE_CREDENTIALS")
                .map(PathBuf::from)
                .unwrap_or(defaults.credentials_path),
            port: parse_var(&lookup, "PVE_PORT")?.unwrap_or(defaults.port),
            default_realm: lookup("PVE_DEFAULT_REALM").unwrap_or(defaults.default_realm),
            secure: parse_bool(&lookup, "PVE_SECURE")?.unwrap_or(defaults.secure),
            accept_invalid_certs: parse_bool(&lookup, "PVE_ACCEPT_INVALID_CERTS")?
                .unwrap_or(defaults.accept_invalid_certs),
            request_timeout: Duration::from_secs(timeout_secs),
            retry_attempts: parse_var(&lookup, "PVE_RETRY_ATTEMPTS")?
                .unwrap_or(defaults.retry_attempts),
            rate_limit_rps: parse_var(&lookup, "PVE_RATE_LIMIT_RPS")?,
            log_file: lookup("PVE_LOG_FILE").map(PathBuf::from),
        })
    }

    /// The HTTP client settings derived from this configuration.
    pub fn client_config(&self) -> ClientConfig {
        let defaults = RetryPolicy::default();
        ClientConfig {
            request_timeout: self.request_timeout,
            retry: RetryPolicy::new(self.retry_attempts, defaults.base_delay, defaults.max_delay),
            rate_limit: self.rate_limit_rps.map(|rps| RateLimitConfig {
                requests_per_second: rps,
                burst_size: rps,
            }),
            ..ClientConfig::default()
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> ProxmoxResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| {
                ProxmoxError::Configuration(format!("Invalid value '{}' for {}: {}", raw, key, e))
            })
        })
        .transpose()
}

fn parse_bool<F>(lookup: &F, key: &str) -> ProxmoxResult<Option<bool>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ProxmoxError::Configuration(format!(
                "Invalid boolean '{}' for {}",
                raw, key
            ))),
        })
        .transpose()
}
