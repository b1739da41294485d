//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(position) => {
                info!("START | position={}", position);
            }
            AppEvent::SessionChanged { from, to } => {
                info!("SESSION | {:?} -> {:?}", from, to);
            }
            AppEvent::MoveStarted(target) => {
                info!("MOVE | started -> {}", target);
            }
            AppEvent::MoveCompleted(position) => {
                info!("MOVE | completed, position={}", position);
            }
            AppEvent::LinkChanged(up) => {
                info!("LINK | {}", if *up { "up" } else { "down" });
            }
        }
    }
}
