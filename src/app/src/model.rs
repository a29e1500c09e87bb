use serde::{Deserialize, Serialize};

use crate::types::*;

/// Application Model - the complete state of the device session
/// Also serves as the ViewModel when serialized (timer bookkeeping is excluded)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Model {
    // Device
    pub device_address: String,
    pub status: DeviceStatus,

    // Connectivity
    pub is_connected: bool,
    pub is_loading: bool,
    pub error_message: Option<String>,

    /// Outstanding device requests; `is_loading` mirrors `in_flight > 0`
    #[serde(skip)]
    pub in_flight: u32,

    // Timers
    #[serde(skip)]
    pub timings: Timings,
    #[serde(skip)]
    pub poll_timer: Option<TimerId>,
    #[serde(skip)]
    pub reconnect_timer: Option<TimerId>,
    #[serde(skip)]
    pub next_timer_id: u64,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            device_address: DEFAULT_DEVICE_ADDRESS.to_string(),
            status: DeviceStatus::default(),
            is_connected: false,
            is_loading: false,
            error_message: None,
            in_flight: 0,
            timings: Timings::default(),
            poll_timer: None,
            reconnect_timer: None,
            next_timer_id: 0,
        }
    }
}

impl Model {
    /// Register a request that is about to be sent
    pub fn start_request(&mut self) {
        self.in_flight += 1;
        self.is_loading = true;
    }

    /// Register a completed request (successful or not)
    pub fn finish_request(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.is_loading = self.in_flight > 0;
    }

    /// Set an error message
    pub fn set_error(&mut self, error: String) {
        self.error_message = Some(error);
    }

    /// Set an error message and return a render command
    pub fn set_error_and_render(
        &mut self,
        error: String,
    ) -> crux_core::Command<crate::Effect, crate::events::Event> {
        self.set_error(error);
        crux_core::render::render()
    }

    /// Clear the error message without affecting the loading state.
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Allocate the id for the next timer
    pub fn next_timer(&mut self) -> TimerId {
        self.next_timer_id += 1;
        TimerId(self.next_timer_id)
    }

    pub fn connection_state(&self) -> ConnectionState {
        match (self.is_connected, self.is_loading) {
            (true, _) => ConnectionState::Connected,
            (false, true) => ConnectionState::Connecting,
            (false, false) => ConnectionState::Disconnected,
        }
    }
}
