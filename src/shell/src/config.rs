use anyhow::{Context, Result};
use esp32_panel_core::{Timings, DEFAULT_DEVICE_ADDRESS, POLL_INTERVAL_MS, RECONNECT_DELAY_MS};
use std::{env, time::Duration};

const DEFAULT_HTTP_TIMEOUT_MS: u64 = 4_000;

/// Shell configuration loaded and validated at startup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Device contacted on startup
    pub device_address: String,

    /// Poll and reconnect periods handed to the core
    pub timings: Timings,

    /// Upper bound for a single device request
    pub http_timeout: Duration,
}

impl AppConfig {
    /// Load the configuration from environment variables
    pub fn load() -> Result<Self> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load the configuration through `lookup`, which maps a variable name to its value
    ///
    /// Missing variables fall back to defaults; present but unparsable values are errors.
    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let device_address =
            lookup("DEVICE_ADDRESS").unwrap_or_else(|| DEFAULT_DEVICE_ADDRESS.to_string());

        let timings = Timings {
            poll_interval_ms: millis(&lookup, "POLL_INTERVAL_MS", POLL_INTERVAL_MS)?,
            reconnect_delay_ms: millis(&lookup, "RECONNECT_DELAY_MS", RECONNECT_DELAY_MS)?,
        };
        timings
            .validate()
            .map_err(anyhow::Error::msg)
            .context("failed to validate timings")?;

        let http_timeout = Duration::from_millis(millis(
            &lookup,
            "HTTP_TIMEOUT_MS",
            DEFAULT_HTTP_TIMEOUT_MS,
        )?);

        Ok(Self {
            device_address,
            timings,
            http_timeout,
        })
    }
}

fn millis(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .with_context(|| format!("failed to parse {key}: invalid format")),
        None => Ok(default),
    }
}
