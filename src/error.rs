//! Error types for the switch-track firmware.
//!
//! Nothing in this firmware is fatal to the process — every error is
//! logged and the control loop carries on — so the variants stay
//! `Copy`-cheap and allocation-free.  Channel errors surface through the
//! [`ChannelPort`](crate::app::ports::ChannelPort) boundary; decode
//! errors are fail-open (the dispatcher logs them and drops the frame).

use core::fmt;

// ---------------------------------------------------------------------------
// Channel errors
// ---------------------------------------------------------------------------

/// Errors from the persistent message channel to the remote controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    /// The channel is not connected; the message was not sent.
    NotConnected,
    /// The underlying transport rejected the write.
    SendFailed,
    /// Establishing the connection failed (the channel layer retries).
    ConnectFailed,
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::SendFailed => write!(f, "send failed"),
            Self::ConnectFailed => write!(f, "connect failed"),
        }
    }
}

impl std::error::Error for ChannelError {}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

/// Errors raised while decoding an inbound wire message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Payload is not syntactically valid JSON.
    MalformedJson,
    /// Payload parsed but carries no `type` discriminator.
    MissingType,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedJson => write!(f, "malformed JSON payload"),
            Self::MissingType => write!(f, "missing `type` field"),
        }
    }
}

impl std::error::Error for DecodeError {}
