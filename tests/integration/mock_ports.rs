//! Mock port adapters for integration tests.
//!
//! Records every hardware call and outbound frame so tests can assert on
//! the full history without touching real GPIO or sockets.

use std::collections::VecDeque;

use serde_json::Value;
use switchtrack::actuator::SwitchPosition;
use switchtrack::app::events::AppEvent;
use switchtrack::app::ports::{
    ChannelEvent, ChannelPort, ConnectivityPort, EventSink, IndicatorPort, MotorPort,
};
use switchtrack::error::ChannelError;

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HwCall {
    Bridge(bool, bool),
    Show(SwitchPosition),
    AllOff,
}

pub struct MockHardware {
    pub calls: Vec<HwCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }

    /// Last bridge write, if any.
    pub fn bridge_levels(&self) -> Option<(bool, bool)> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::Bridge(in1, in2) => Some((*in1, *in2)),
            _ => None,
        })
    }

    /// Which position indicator is lit, if any.
    pub fn lit(&self) -> Option<SwitchPosition> {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                HwCall::Show(p) => Some(Some(*p)),
                HwCall::AllOff => Some(None),
                HwCall::Bridge(..) => None,
            })
            .flatten()
    }

    /// True if the most recent indicator call extinguished the LEDs.
    pub fn leds_dark(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                HwCall::Show(_) => Some(false),
                HwCall::AllOff => Some(true),
                HwCall::Bridge(..) => None,
            })
            .unwrap_or(true)
    }
}

impl MotorPort for MockHardware {
    fn set_bridge(&mut self, in1: bool, in2: bool) {
        self.calls.push(HwCall::Bridge(in1, in2));
    }
}

impl IndicatorPort for MockHardware {
    fn show_position(&mut self, position: SwitchPosition) {
        self.calls.push(HwCall::Show(position));
    }

    fn all_off(&mut self) {
        self.calls.push(HwCall::AllOff);
    }
}

// ── Scripted channel ──────────────────────────────────────────

/// Channel mock that reports a transport connection as soon as
/// `connect()` is called and lets tests inject inbound frames.
pub struct ScriptedChannel {
    pub queue: VecDeque<ChannelEvent>,
    pub sent: Vec<String>,
    pub connected: bool,
    pub connect_calls: u32,
}

#[allow(dead_code)]
impl ScriptedChannel {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            sent: Vec::new(),
            connected: false,
            connect_calls: 0,
        }
    }

    pub fn inject_text(&mut self, raw: &str) {
        self.queue.push_back(ChannelEvent::Text(raw.to_owned()));
    }

    pub fn inject_disconnect(&mut self) {
        self.queue.push_back(ChannelEvent::Disconnected);
    }

    pub fn sent_json(&self, index: usize) -> Value {
        serde_json::from_str(&self.sent[index]).expect("sent frame is not JSON")
    }

    pub fn last_json(&self) -> Value {
        serde_json::from_str(self.sent.last().expect("nothing sent")).unwrap()
    }

    /// Count of sent frames with the given `type` discriminator.
    pub fn sent_of_type(&self, kind: &str) -> usize {
        self.sent
            .iter()
            .filter(|raw| {
                serde_json::from_str::<Value>(raw)
                    .map(|v| v["type"] == kind)
                    .unwrap_or(false)
            })
            .count()
    }
}

impl ChannelPort for ScriptedChannel {
    fn connect(&mut self) -> Result<(), ChannelError> {
        self.connect_calls += 1;
        self.queue.push_back(ChannelEvent::Connected);
        Ok(())
    }

    fn send_text(&mut self, text: &str) -> Result<(), ChannelError> {
        if !self.connected {
            return Err(ChannelError::NotConnected);
        }
        self.sent.push(text.to_owned());
        Ok(())
    }

    fn poll(&mut self) -> Option<ChannelEvent> {
        let event = self.queue.pop_front()?;
        match event {
            ChannelEvent::Connected => self.connected = true,
            ChannelEvent::Disconnected => self.connected = false,
            ChannelEvent::Text(_) => {}
        }
        Some(event)
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

// ── Network mock ──────────────────────────────────────────────

pub struct MockNet {
    pub up: bool,
}

impl ConnectivityPort for MockNet {
    fn poll(&mut self) {}

    fn is_connected(&self) -> bool {
        self.up
    }

    fn rssi(&self) -> Option<i8> {
        self.up.then_some(-58)
    }
}

// ── Event sink ────────────────────────────────────────────────

pub struct CollectSink(pub Vec<AppEvent>);

#[allow(dead_code)]
impl CollectSink {
    pub fn new() -> Self {
        Self(Vec::new())
    }
}

impl EventSink for CollectSink {
    fn emit(&mut self, event: &AppEvent) {
        self.0.push(event.clone());
    }
}
