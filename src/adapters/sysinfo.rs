//! System diagnostics sampling for heartbeat frames.

use crate::app::ports::{ConnectivityPort, LinkStats};

/// Free heap in bytes.
#[cfg(target_os = "espidf")]
pub fn free_heap_bytes() -> u32 {
    unsafe { esp_idf_svc::sys::esp_get_free_heap_size() }
}

/// Free heap in bytes (simulation: a plausible ESP32 figure).
#[cfg(not(target_os = "espidf"))]
pub fn free_heap_bytes() -> u32 {
    180_000
}

/// Sample the link diagnostics reported in heartbeat frames.
pub fn sample_link_stats(net: &impl ConnectivityPort) -> LinkStats {
    LinkStats {
        wifi_rssi: net.rssi().map_or(0, i32::from),
        free_heap: free_heap_bytes(),
    }
}
