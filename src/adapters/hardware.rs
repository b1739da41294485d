//! Combined hardware adapter.
//!
//! Owns the bridge and indicator drivers and presents them to the
//! application core as a single value implementing both [`MotorPort`]
//! and [`IndicatorPort`].  Keeping them behind one adapter avoids a
//! double mutable borrow when the service needs motor and LEDs in the
//! same tick.

use crate::actuator::SwitchPosition;
use crate::app::ports::{IndicatorPort, MotorPort};
use crate::drivers::bridge::BridgeDriver;
use crate::drivers::indicator::IndicatorLeds;

pub struct HardwareAdapter {
    bridge: BridgeDriver,
    leds: IndicatorLeds,
}

impl HardwareAdapter {
    pub fn new(bridge: BridgeDriver, leds: IndicatorLeds) -> Self {
        Self { bridge, leds }
    }

    /// Bridge pin shadow, for diagnostics.
    pub fn bridge_levels(&self) -> (bool, bool) {
        self.bridge.levels()
    }

    /// LED shadow, for diagnostics.
    pub fn led_levels(&self) -> (bool, bool) {
        self.leds.levels()
    }
}

impl Default for HardwareAdapter {
    fn default() -> Self {
        Self::new(BridgeDriver::new(), IndicatorLeds::new())
    }
}

impl MotorPort for HardwareAdapter {
    fn set_bridge(&mut self, in1: bool, in2: bool) {
        self.bridge.set_bridge(in1, in2);
    }
}

impl IndicatorPort for HardwareAdapter {
    fn show_position(&mut self, position: SwitchPosition) {
        self.leds.show_position(position);
    }

    fn all_off(&mut self) {
        self.leds.all_off();
    }
}
