//! Position indicator LEDs.
//!
//! One LED per switch position; exactly one lit when the position is
//! confirmed, both dark while unauthenticated or mid-move.

use crate::actuator::SwitchPosition;
use crate::app::ports::IndicatorPort;
use crate::drivers::hw_init;
use crate::pins;

pub struct IndicatorLeds {
    left: bool,
    right: bool,
}

impl IndicatorLeds {
    pub fn new() -> Self {
        Self {
            left: false,
            right: false,
        }
    }

    fn write(&mut self, left: bool, right: bool) {
        hw_init::gpio_write(pins::LED_LEFT_GPIO, left);
        hw_init::gpio_write(pins::LED_RIGHT_GPIO, right);
        self.left = left;
        self.right = right;
    }

    /// Shadow of the LED levels `(left, right)`.
    pub fn levels(&self) -> (bool, bool) {
        (self.left, self.right)
    }
}

impl Default for IndicatorLeds {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorPort for IndicatorLeds {
    fn show_position(&mut self, position: SwitchPosition) {
        match position {
            SwitchPosition::Left => self.write(true, false),
            SwitchPosition::Right => self.write(false, true),
        }
    }

    fn all_off(&mut self) {
        self.write(false, false);
    }
}
