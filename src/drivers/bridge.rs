//! DRV8871 H-bridge output driver.
//!
//! Drives the two bridge input pins and nothing else.  The driver keeps
//! a shadow of the last written levels so tests (and the safety layer,
//! if it ever wants to audit) can observe the pin state on any target.
//!
//! All timing — dead-time insertion, drive duration, coast on
//! completion — belongs to the actuator controller upstream.  This type
//! must stay sequencing-free.

use crate::app::ports::MotorPort;
use crate::drivers::hw_init;
use crate::pins;

pub struct BridgeDriver {
    in1: bool,
    in2: bool,
}

impl BridgeDriver {
    /// Shadow starts in coast; the caller is expected to write coast
    /// explicitly during actuator init so hardware and shadow agree.
    pub fn new() -> Self {
        Self {
            in1: false,
            in2: false,
        }
    }

    /// Last written levels `(in1, in2)`.
    pub fn levels(&self) -> (bool, bool) {
        (self.in1, self.in2)
    }
}

impl Default for BridgeDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MotorPort for BridgeDriver {
    fn set_bridge(&mut self, in1: bool, in2: bool) {
        hw_init::gpio_write(pins::BRIDGE_IN1_GPIO, in1);
        hw_init::gpio_write(pins::BRIDGE_IN2_GPIO, in2);
        self.in1 = in1;
        self.in2 = in2;
    }
}
