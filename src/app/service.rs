//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the five controllers and drives one cooperative
//! cycle per loop iteration.  All I/O flows through port traits injected
//! at call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  ConnectivityPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!  ChannelPort     ◀──▶ │          AppService          │
//!                       │  Session · Command · Actuator │
//!  MotorPort       ◀────│  Telemetry · Monitor          │
//!  IndicatorPort   ◀────└──────────────────────────────┘
//! ```
//!
//! SessionState and SwitchPosition each have a single writer (the
//! session and actuator controllers respectively), both reached only
//! from [`tick`](AppService::tick) — one mutation site per loop pass.

use crate::actuator::{ActuatorSafetyController, SwitchPosition};
use crate::command::CommandProcessor;
use crate::config::SystemConfig;
use crate::monitor::ConnectivityMonitor;
use crate::session::{Dispatch, SessionController, SessionState};
use crate::telemetry::TelemetryScheduler;

use super::events::AppEvent;
use super::ports::{
    ChannelEvent, ChannelPort, ConnectivityPort, EventSink, IndicatorPort, LinkStats, MotorPort,
};

/// The application service orchestrates all domain logic.
pub struct AppService {
    session: SessionController,
    processor: CommandProcessor,
    actuator: ActuatorSafetyController,
    telemetry: TelemetryScheduler,
    monitor: ConnectivityMonitor,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch hardware — call [`start`](Self::start) next.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            session: SessionController::new(config.identity.clone()),
            processor: CommandProcessor::new(),
            actuator: ActuatorSafetyController::new(
                config.initial_position,
                config.dead_time_ms,
                config.run_time_ms,
            ),
            telemetry: TelemetryScheduler::new(
                config.heartbeat_interval_secs,
                config.telemetry_interval_secs,
            ),
            monitor: ConnectivityMonitor::new(config.status_poll_interval_secs),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Put the bridge in coast and light the boot-position indicator.
    pub fn start(&mut self, hw: &mut (impl MotorPort + IndicatorPort), sink: &mut impl EventSink) {
        self.actuator.init(hw);
        hw.show_position(self.actuator.position());
        sink.emit(&AppEvent::Started(self.actuator.position()));
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full cooperative cycle.
    ///
    /// The `hw` parameter satisfies **both** [`MotorPort`] and
    /// [`IndicatorPort`] — this avoids a double mutable borrow while
    /// keeping the port boundary explicit.  `stats` carries the link
    /// diagnostics sampled by the caller for heartbeat frames.
    pub fn tick(
        &mut self,
        now_ms: u64,
        uptime_ms: u64,
        stats: LinkStats,
        net: &mut impl ConnectivityPort,
        channel: &mut impl ChannelPort,
        hw: &mut (impl MotorPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) {
        let session_before = self.session.state();

        // 1. Advance the WiFi driver; act on debounced link transitions.
        net.poll();
        if let Some(up) = self
            .monitor
            .tick(now_ms, net, &mut self.session, channel, hw)
        {
            sink.emit(&AppEvent::LinkChanged(up));
        }

        // 2. Drain inbound channel events.
        while let Some(event) = channel.poll() {
            self.handle_channel_event(event, now_ms, uptime_ms, channel, hw, sink);
        }

        // 3. Advance the actuator move sequence.
        if let Some(position) = self.actuator.tick(now_ms, hw) {
            // Indicators stay dark if authentication was lost mid-move.
            if self.session.is_authenticated() {
                hw.show_position(position);
            }
            self.processor
                .on_move_complete(position, &self.session, channel);
            sink.emit(&AppEvent::MoveCompleted(position));
        }

        // 4. Periodic heartbeat / telemetry.
        self.telemetry.tick(
            now_ms,
            uptime_ms,
            self.actuator.position(),
            stats,
            &self.session,
            channel,
        );

        let session_after = self.session.state();
        if session_after != session_before {
            sink.emit(&AppEvent::SessionChanged {
                from: session_before,
                to: session_after,
            });
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Confirmed physical switch position.
    pub fn position(&self) -> SwitchPosition {
        self.actuator.position()
    }

    /// Current session state.
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// True while a move sequence is in flight.
    pub fn is_moving(&self) -> bool {
        self.actuator.is_moving()
    }

    // ── Internal ──────────────────────────────────────────────

    fn handle_channel_event(
        &mut self,
        event: ChannelEvent,
        now_ms: u64,
        uptime_ms: u64,
        channel: &mut impl ChannelPort,
        hw: &mut (impl MotorPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) {
        match event {
            ChannelEvent::Connected => {
                self.session
                    .on_channel_connected(channel, self.actuator.position(), uptime_ms);
            }
            ChannelEvent::Disconnected => {
                self.session.on_channel_disconnected(hw);
            }
            ChannelEvent::Text(raw) => {
                match self
                    .session
                    .on_message(&raw, self.actuator.position(), hw)
                {
                    Dispatch::Authenticated => {
                        self.telemetry.on_authenticated(now_ms);
                    }
                    Dispatch::Command { command } => {
                        if let Some(target) = self.processor.handle(
                            command,
                            now_ms,
                            &self.session,
                            &mut self.actuator,
                            hw,
                            channel,
                        ) {
                            sink.emit(&AppEvent::MoveStarted(target));
                        }
                    }
                    Dispatch::Handled => {}
                }
            }
        }
    }
}
