//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (H-bridge, indicator LEDs, message channel, WiFi,
//! event sinks) implement these traits.  The
//! [`AppService`](super::service::AppService) consumes them via generics,
//! so the domain core never touches hardware or sockets directly.

use crate::actuator::SwitchPosition;
use crate::error::ChannelError;

// ───────────────────────────────────────────────────────────────
// Motor port (domain → H-bridge)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the DRV8871 bridge inputs.
///
/// A single call sets both inputs, so no intermediate pin state is ever
/// observable.  The actuator controller guarantees it never requests
/// `(true, true)`.
pub trait MotorPort {
    /// Drive IN1/IN2.  `(false, false)` is coast.
    fn set_bridge(&mut self, in1: bool, in2: bool);
}

// ───────────────────────────────────────────────────────────────
// Indicator port (domain → position LEDs)
// ───────────────────────────────────────────────────────────────

/// The two position indicator LEDs, mirroring the confirmed position.
pub trait IndicatorPort {
    /// Light the LED for `position`, extinguish the other.
    fn show_position(&mut self, position: SwitchPosition);

    /// Both LEDs off (unauthenticated / disconnected / faulted).
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Channel port (domain ↔ persistent message transport)
// ───────────────────────────────────────────────────────────────

/// Events surfaced by the channel layer, drained once per loop tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Transport established end-to-end.
    Connected,
    /// Transport lost; the channel layer keeps retrying on its own.
    Disconnected,
    /// A complete inbound text frame.
    Text(String),
}

/// Persistent, reliable text-message transport to the remote controller.
///
/// Reconnection policy lives entirely inside implementations: while
/// disconnected they retry at a fixed interval and surface the outcome
/// as [`ChannelEvent`]s.  The session controller never retries itself.
pub trait ChannelPort {
    /// Begin (re-)establishing the connection.  Completion is reported
    /// asynchronously via [`ChannelEvent::Connected`].
    fn connect(&mut self) -> Result<(), ChannelError>;

    /// Send one text frame.  Fire-and-forget from the domain's view.
    fn send_text(&mut self, text: &str) -> Result<(), ChannelError>;

    /// Next pending event, if any.
    fn poll(&mut self) -> Option<ChannelEvent>;

    /// Whether the transport is currently connected.
    fn is_connected(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Connectivity port (underlying network status)
// ───────────────────────────────────────────────────────────────

/// Read-side port over the WiFi provisioning subsystem.  The portal and
/// credential handling behind it are a black box to the domain.
pub trait ConnectivityPort {
    /// Advance the underlying driver (portal, DNS, timeouts).
    fn poll(&mut self);

    /// Station currently associated with an AP.
    fn is_connected(&self) -> bool;

    /// Signal strength in dBm when connected.
    fn rssi(&self) -> Option<i8>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / diagnostics)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log today;
/// a diagnostics characteristic later).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Link diagnostics
// ───────────────────────────────────────────────────────────────

/// Point-in-time link diagnostics attached to heartbeat frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkStats {
    /// WiFi RSSI in dBm (0 when unknown).
    pub wifi_rssi: i32,
    /// Free heap in bytes.
    pub free_heap: u32,
}
