//! Telemetry scheduler — periodic heartbeat and telemetry emission.
//!
//! Two independent timers, advanced by the cooperative loop's tick.
//! Emission is fire-and-forget over the channel; no acknowledgment is
//! awaited.  Nothing is ever emitted while unauthenticated, and each
//! timer fires at most once per elapsed interval boundary.

use log::{debug, warn};

use crate::actuator::SwitchPosition;
use crate::app::ports::{ChannelPort, LinkStats};
use crate::session::SessionController;
use crate::protocol::Outbound;

pub struct TelemetryScheduler {
    heartbeat_interval_ms: u64,
    telemetry_interval_ms: u64,
    last_heartbeat_ms: u64,
    last_telemetry_ms: u64,
    /// Set on authentication: the controller expects an initial snapshot
    /// right after the handshake, ahead of the normal interval.
    initial_report_due: bool,
}

impl TelemetryScheduler {
    pub fn new(heartbeat_interval_secs: u32, telemetry_interval_secs: u32) -> Self {
        Self {
            heartbeat_interval_ms: u64::from(heartbeat_interval_secs) * 1000,
            telemetry_interval_ms: u64::from(telemetry_interval_secs) * 1000,
            last_heartbeat_ms: 0,
            last_telemetry_ms: 0,
            initial_report_due: false,
        }
    }

    /// Rebase both timers at the moment authentication is granted and
    /// queue the initial telemetry snapshot for the next tick.
    pub fn on_authenticated(&mut self, now_ms: u64) {
        self.last_heartbeat_ms = now_ms;
        self.last_telemetry_ms = now_ms;
        self.initial_report_due = true;
    }

    /// Advance the timers; emit whatever is due.  Both checks are
    /// independent and may fire in the same tick.
    pub fn tick(
        &mut self,
        now_ms: u64,
        uptime_ms: u64,
        position: SwitchPosition,
        stats: LinkStats,
        session: &SessionController,
        channel: &mut impl ChannelPort,
    ) {
        if !session.is_authenticated() {
            return;
        }
        let identity = session.identity();

        if now_ms.saturating_sub(self.last_heartbeat_ms) >= self.heartbeat_interval_ms {
            self.last_heartbeat_ms = now_ms;
            let frame = Outbound::Heartbeat {
                module_id: identity.id.as_str(),
                password: identity.secret.as_str(),
                uptime: uptime_ms,
                position,
                wifi_rssi: stats.wifi_rssi,
                free_heap: stats.free_heap,
            }
            .encode();
            match channel.send_text(&frame) {
                Ok(()) => debug!("telemetry: heartbeat sent"),
                Err(e) => warn!("telemetry: heartbeat send failed: {}", e),
            }
        }

        if self.initial_report_due
            || now_ms.saturating_sub(self.last_telemetry_ms) >= self.telemetry_interval_ms
        {
            self.initial_report_due = false;
            self.last_telemetry_ms = now_ms;
            let frame = Outbound::Telemetry {
                module_id: identity.id.as_str(),
                password: identity.secret.as_str(),
                uptime: uptime_ms,
                position,
                status: "operational",
            }
            .encode();
            match channel.send_text(&frame) {
                Ok(()) => debug!("telemetry: report sent"),
                Err(e) => warn!("telemetry: report send failed: {}", e),
            }
        }
    }
}
