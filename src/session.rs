//! Session controller — authentication lifecycle over the message channel.
//!
//! Owns the session state machine:
//!
//! ```text
//! Disconnected ──connect()──▶ ConnectingChannel ──channel up──▶ AwaitingAuthAck
//!                                                                    │ Connected msg
//!                                                                    ▼
//!        ◀──────────────channel down (any state)────────────── Authenticated
//!                                                                    │ Error msg
//!                                                                    ▼
//!                                                                 Faulted
//! ```
//!
//! Reconnection is the channel layer's job; this controller only reacts
//! to channel events.  De-authentication (disconnect, fault, link loss)
//! always extinguishes both position indicators.

use log::{info, warn};

use crate::actuator::SwitchPosition;
use crate::app::ports::{ChannelPort, IndicatorPort};
use crate::config::ModuleIdentity;
use crate::protocol::{self, Inbound};

/// Session lifecycle state.  Owned exclusively by [`SessionController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    ConnectingChannel,
    AwaitingAuthAck,
    Authenticated,
    Faulted,
}

/// Outcome of dispatching one inbound frame.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Consumed by the session layer (ack, fault, unknown, malformed).
    Handled,
    /// Authentication was just granted on this frame.
    Authenticated,
    /// A command frame for the [`CommandProcessor`](crate::command::CommandProcessor).
    Command { command: Option<String> },
}

pub struct SessionController {
    identity: ModuleIdentity,
    state: SessionState,
}

impl SessionController {
    pub fn new(identity: ModuleIdentity) -> Self {
        Self {
            identity,
            state: SessionState::Disconnected,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Credentials attached to every outbound frame.
    pub fn identity(&self) -> &ModuleIdentity {
        &self.identity
    }

    /// True only in [`SessionState::Authenticated`].
    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// Begin establishing the channel.  Called at startup when the network
    /// is already up and by the connectivity monitor on a rising edge.
    pub fn connect(&mut self, channel: &mut impl ChannelPort) {
        info!(
            "session: connecting channel (module {})",
            self.identity.id.as_str()
        );
        self.state = SessionState::ConnectingChannel;
        if let Err(e) = channel.connect() {
            // The channel layer keeps retrying at its fixed interval.
            warn!("session: channel connect failed: {}", e);
        }
    }

    /// Channel transport established — send the identify handshake.
    pub fn on_channel_connected(
        &mut self,
        channel: &mut impl ChannelPort,
        position: SwitchPosition,
        uptime_ms: u64,
    ) {
        info!("session: channel up, identifying");
        self.state = SessionState::AwaitingAuthAck;
        let frame = protocol::identify(&self.identity, uptime_ms, position).encode();
        if let Err(e) = channel.send_text(&frame) {
            warn!("session: identify send failed: {}", e);
        }
    }

    /// Channel transport lost (or network forced down).  Clears auth and
    /// extinguishes the indicators regardless of prior state.
    pub fn on_channel_disconnected(&mut self, indicators: &mut impl IndicatorPort) {
        if self.state != SessionState::Disconnected {
            warn!("session: channel down, de-authenticated");
        }
        self.state = SessionState::Disconnected;
        indicators.all_off();
    }

    /// Dispatch one inbound text frame.
    ///
    /// Handshake acks and server errors are consumed here; command frames
    /// are returned for the processor.  Malformed and unrecognised frames
    /// are logged and dropped — never a crash, never a state change.
    pub fn on_message(
        &mut self,
        raw: &str,
        position: SwitchPosition,
        indicators: &mut impl IndicatorPort,
    ) -> Dispatch {
        let inbound = match protocol::decode(raw) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("session: dropped inbound frame ({})", e);
                return Dispatch::Handled;
            }
        };

        match inbound {
            Inbound::Connected => {
                if self.state == SessionState::AwaitingAuthAck {
                    info!("session: authenticated");
                    self.state = SessionState::Authenticated;
                    indicators.show_position(position);
                    Dispatch::Authenticated
                } else {
                    warn!("session: unexpected auth ack in {:?}", self.state);
                    Dispatch::Handled
                }
            }
            Inbound::ServerError => {
                warn!("session: server error, session faulted");
                self.state = SessionState::Faulted;
                indicators.all_off();
                Dispatch::Handled
            }
            Inbound::Command { command } => Dispatch::Command { command },
            Inbound::Unknown(kind) => {
                warn!("session: unhandled message type '{}'", kind);
                Dispatch::Handled
            }
        }
    }
}
