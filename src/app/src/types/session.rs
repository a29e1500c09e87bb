use serde::{Deserialize, Serialize};

/// Address used until the user enters one
pub const DEFAULT_DEVICE_ADDRESS: &str = "esp32.local";

pub const POLL_INTERVAL_MS: u64 = 5_000;
pub const RECONNECT_DELAY_MS: u64 = 3_000;

/// Connectivity as presented to the user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    /// Disconnected with a request in flight
    Connecting,
    Connected,
}

/// Timer periods used by the session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timings {
    pub poll_interval_ms: u64,
    pub reconnect_delay_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            poll_interval_ms: POLL_INTERVAL_MS,
            reconnect_delay_ms: RECONNECT_DELAY_MS,
        }
    }
}

impl Timings {
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_ms == 0 {
            return Err("Poll interval must be greater than zero".to_string());
        }
        if self.reconnect_delay_ms == 0 {
            return Err("Reconnect delay must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Identity of an armed timer, unique for the lifetime of a session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}
