//! Adapters — the outer ring of the hexagonal architecture.
//!
//! Each adapter implements one or more port traits from
//! [`crate::app::ports`] on top of a platform facility (GPIO drivers,
//! the ESP-IDF WiFi stack, the WebSocket client, the system timer).
//! Everything ESP-IDF-specific is gated on `target_os = "espidf"` with
//! simulation stubs for host-side tests.

pub mod channel;
pub mod hardware;
pub mod log_sink;
pub mod sysinfo;
pub mod time;
pub mod wifi;
