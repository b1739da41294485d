//! Wire protocol — tagged JSON messages to and from the remote controller.
//!
//! The wire representation is a flat object with a `type` discriminator;
//! the semantic model is the two tagged enums below.  Decoding happens
//! once at the boundary — no `type` string comparisons leak into the
//! controllers.
//!
//! Outbound messages carry the module credentials on every frame; the
//! controller re-validates them server-side.

use log::error;
use serde::Serialize;
use serde_json::Value;

use crate::actuator::SwitchPosition;
use crate::config::ModuleIdentity;
use crate::error::DecodeError;

// ---------------------------------------------------------------------------
// Outbound messages
// ---------------------------------------------------------------------------

/// Result of a command, reported back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Success,
    UnknownCommand,
}

impl CommandStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::UnknownCommand => "unknown_command",
        }
    }
}

/// Messages the module sends to the controller.
///
/// Borrowed fields keep encoding allocation-free apart from the output
/// string itself.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Outbound<'a> {
    /// Identify handshake, sent immediately after the channel connects.
    #[serde(rename = "module_identify")]
    Identify {
        #[serde(rename = "moduleId")]
        module_id: &'a str,
        password: &'a str,
        #[serde(rename = "moduleType")]
        module_type: &'a str,
        /// Milliseconds since boot.
        uptime: u64,
        position: SwitchPosition,
    },

    /// Reply to an inbound command.
    #[serde(rename = "command_response")]
    CommandResponse {
        #[serde(rename = "moduleId")]
        module_id: &'a str,
        password: &'a str,
        command: &'a str,
        status: CommandStatus,
        position: SwitchPosition,
    },

    /// Application-level keepalive with link diagnostics.
    #[serde(rename = "heartbeat")]
    Heartbeat {
        #[serde(rename = "moduleId")]
        module_id: &'a str,
        password: &'a str,
        uptime: u64,
        position: SwitchPosition,
        #[serde(rename = "wifiRSSI")]
        wifi_rssi: i32,
        #[serde(rename = "freeHeap")]
        free_heap: u32,
    },

    /// Periodic operational snapshot.
    #[serde(rename = "telemetry")]
    Telemetry {
        #[serde(rename = "moduleId")]
        module_id: &'a str,
        password: &'a str,
        uptime: u64,
        position: SwitchPosition,
        status: &'a str,
    },
}

impl Outbound<'_> {
    /// Serialise to the wire string.
    ///
    /// Serialisation of these enums cannot fail in practice; an empty
    /// string is returned (and logged) rather than panicking if it does.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            error!("protocol: encode failed: {}", e);
            String::new()
        })
    }
}

/// Build the identify handshake for `identity`.
pub fn identify<'a>(
    identity: &'a ModuleIdentity,
    uptime_ms: u64,
    position: SwitchPosition,
) -> Outbound<'a> {
    Outbound::Identify {
        module_id: identity.id.as_str(),
        password: identity.secret.as_str(),
        module_type: identity.module_type.as_str(),
        uptime: uptime_ms,
        position,
    }
}

// ---------------------------------------------------------------------------
// Inbound messages
// ---------------------------------------------------------------------------

/// Messages the controller sends to the module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Authentication acknowledged.
    Connected,
    /// Remote command.  `command` is `None` when the field is missing or
    /// not a string — the processor reports `unknown_command` for those.
    Command { command: Option<String> },
    /// Server-side error; forces de-authentication.
    ServerError,
    /// Well-formed message with an unrecognised `type` (logged, ignored).
    Unknown(String),
}

/// Decode a raw channel text frame.
///
/// Syntactically malformed payloads fail here and are dropped by the
/// dispatcher; a valid envelope with a bad `data.command` still yields
/// [`Inbound::Command`] so the processor can answer `unknown_command`.
pub fn decode(raw: &str) -> Result<Inbound, DecodeError> {
    let value: Value = serde_json::from_str(raw).map_err(|_| DecodeError::MalformedJson)?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingType)?;

    match kind {
        "connected" => Ok(Inbound::Connected),
        "error" => Ok(Inbound::ServerError),
        "command" => {
            let command = value
                .get("data")
                .and_then(|d| d.get("command"))
                .and_then(Value::as_str)
                .map(str::to_owned);
            Ok(Inbound::Command { command })
        }
        other => Ok(Inbound::Unknown(other.to_owned())),
    }
}
