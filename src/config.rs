//! System configuration parameters
//!
//! All tunable parameters for the switch-track module: identity and server
//! endpoint, actuator timing, and the periodic intervals of the control
//! loop.  Values are serde-serialisable so a future provisioning channel
//! can override them; today they ship as compile-time defaults.

use serde::{Deserialize, Serialize};

use crate::actuator::SwitchPosition;

/// Immutable module identity, set at build/provisioning time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleIdentity {
    /// Unique module id (e.g. "MC-0001-ST").
    pub id: heapless::String<24>,
    /// Shared secret presented during the identify handshake.
    pub secret: heapless::String<48>,
    /// Module class reported to the controller (e.g. "switch-track").
    pub module_type: heapless::String<24>,
}

impl Default for ModuleIdentity {
    fn default() -> Self {
        Self {
            id: heapless::String::try_from("MC-0001-ST").unwrap_or_default(),
            secret: heapless::String::try_from("F674iaRftVsHGKOA8hq3TI93HQHUaYqZ")
                .unwrap_or_default(),
            module_type: heapless::String::try_from("switch-track").unwrap_or_default(),
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Module identity presented to the remote controller.
    pub identity: ModuleIdentity,

    // --- Server endpoint ---
    /// Remote controller host (WSS).
    pub server_host: heapless::String<64>,
    /// Remote controller port.
    pub server_port: u16,
    /// WebSocket endpoint path for ESP32 modules.
    pub server_path: heapless::String<32>,

    // --- Actuator timing ---
    /// Dead-time with both bridge inputs low before reversing (ms).
    pub dead_time_ms: u64,
    /// Open-loop travel time of the mechanism (ms).
    pub run_time_ms: u64,
    /// Switch position assumed at power-on.
    pub initial_position: SwitchPosition,

    // --- Periodic intervals ---
    /// Application-level heartbeat interval (seconds).
    pub heartbeat_interval_secs: u32,
    /// Telemetry report interval (seconds).
    pub telemetry_interval_secs: u32,
    /// Connectivity status poll interval (seconds).
    pub status_poll_interval_secs: u32,

    // --- Channel layer ---
    /// Channel auto-reconnect interval while disconnected (seconds).
    pub reconnect_interval_secs: u32,
    /// Transport-level keepalive ping interval (seconds).
    pub keepalive_interval_secs: u32,
    /// Keepalive pong timeout (seconds).
    pub keepalive_timeout_secs: u32,
    /// Keepalive retries before the channel declares disconnect.
    pub keepalive_retries: u8,

    // --- Control loop ---
    /// Idle delay between cooperative loop iterations (ms).
    pub loop_idle_delay_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            identity: ModuleIdentity::default(),

            // Server
            server_host: heapless::String::try_from("app.microcoaster.com").unwrap_or_default(),
            server_port: 443,
            server_path: heapless::String::try_from("/esp32").unwrap_or_default(),

            // Actuator: 10 ms dead-time, 1.1 s timed travel
            dead_time_ms: 10,
            run_time_ms: 1100,
            initial_position: SwitchPosition::Left,

            // Intervals
            heartbeat_interval_secs: 30,
            telemetry_interval_secs: 10,
            status_poll_interval_secs: 30,

            // Channel
            reconnect_interval_secs: 5,
            keepalive_interval_secs: 15,
            keepalive_timeout_secs: 3,
            keepalive_retries: 2,

            // Loop
            loop_idle_delay_ms: 100,
        }
    }
}
