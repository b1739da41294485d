//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — today they go to the serial log.

use crate::actuator::SwitchPosition;
use crate::session::SessionState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The application service has started (carries the boot position).
    Started(SwitchPosition),

    /// The session state machine moved.
    SessionChanged { from: SessionState, to: SessionState },

    /// A motion command was accepted and the actuator sequence began.
    MoveStarted(SwitchPosition),

    /// A move ran to completion; the position is confirmed.
    MoveCompleted(SwitchPosition),

    /// Debounced WiFi link transition (true = up).
    LinkChanged(bool),
}
