//! Command processor — inbound commands to actuator motion and responses.
//!
//! Fail-closed: nothing is executed and nothing is answered unless the
//! session is authenticated.  Motion commands start a non-blocking move
//! on the actuator controller; the `command_response` frame goes out on
//! the tick that completes the move, carrying the confirmed position.
//! `get_position` and unrecognised commands are answered immediately.

use log::{info, warn};

use crate::actuator::{ActuatorSafetyController, SwitchPosition};
use crate::app::ports::{ChannelPort, MotorPort};
use crate::protocol::{CommandStatus, Outbound};
use crate::session::SessionController;

/// Semantic command, resolved from the wire vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Move(SwitchPosition),
    GetPosition,
    Unknown,
}

/// Resolve a command string.  Case-sensitive; several synonyms map to the
/// same target position.
pub fn parse_command(command: &str) -> CommandKind {
    match command {
        "switch_left" | "left" | "switch_to_A" => CommandKind::Move(SwitchPosition::Left),
        "switch_right" | "right" | "switch_to_B" => CommandKind::Move(SwitchPosition::Right),
        "get_position" => CommandKind::GetPosition,
        _ => CommandKind::Unknown,
    }
}

pub struct CommandProcessor {
    /// Command string of the in-flight move, echoed in its response.
    pending: Option<String>,
}

impl CommandProcessor {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// True while a motion command awaits its completion response.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Handle one inbound command frame.
    ///
    /// `command` is `None` when the frame carried no usable `command`
    /// field; that is answered as `unknown_command` with an empty echo.
    /// Returns the target position when a move was started, so the caller
    /// can surface a move-started event.
    pub fn handle(
        &mut self,
        command: Option<String>,
        now_ms: u64,
        session: &SessionController,
        actuator: &mut ActuatorSafetyController,
        motor: &mut impl MotorPort,
        channel: &mut impl ChannelPort,
    ) -> Option<SwitchPosition> {
        if !session.is_authenticated() {
            warn!("command: refused, not authenticated");
            return None;
        }

        let command = command.unwrap_or_default();
        info!("command: received '{}'", command);

        match parse_command(&command) {
            CommandKind::Move(target) => {
                if actuator.is_moving() {
                    // Queuing is out of scope; one move at a time.
                    warn!("command: '{}' dropped, move in flight", command);
                    return None;
                }
                if actuator.start_move(target, now_ms, motor) {
                    self.pending = Some(command);
                    return Some(target);
                }
                None
            }
            CommandKind::GetPosition => {
                send_response(
                    channel,
                    session,
                    &command,
                    CommandStatus::Success,
                    actuator.position(),
                );
                None
            }
            CommandKind::Unknown => {
                warn!("command: unknown '{}'", command);
                send_response(
                    channel,
                    session,
                    &command,
                    CommandStatus::UnknownCommand,
                    actuator.position(),
                );
                None
            }
        }
    }

    /// Called on the tick that completes a move: send the deferred
    /// response with the confirmed position.  If authentication was lost
    /// mid-move the response is dropped — outbound frames are only built
    /// while authenticated.
    pub fn on_move_complete(
        &mut self,
        position: SwitchPosition,
        session: &SessionController,
        channel: &mut impl ChannelPort,
    ) {
        let Some(command) = self.pending.take() else {
            return;
        };
        if !session.is_authenticated() {
            warn!("command: '{}' completed but session lost, response dropped", command);
            return;
        }
        send_response(channel, session, &command, CommandStatus::Success, position);
    }
}

fn send_response(
    channel: &mut impl ChannelPort,
    session: &SessionController,
    command: &str,
    status: CommandStatus,
    position: SwitchPosition,
) {
    let identity = session.identity();
    let frame = Outbound::CommandResponse {
        module_id: identity.id.as_str(),
        password: identity.secret.as_str(),
        command,
        status,
        position,
    }
    .encode();
    if let Err(e) = channel.send_text(&frame) {
        warn!("command: response send failed: {}", e);
    } else {
        info!("command: '{}' -> {}", command, status.as_str());
    }
}
