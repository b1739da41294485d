//! GPIO pin assignments for the switch-track main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Position indicator LEDs
// ---------------------------------------------------------------------------

/// Digital output: LED lit while the switch rests in the left position.
pub const LED_LEFT_GPIO: i32 = 2;
/// Digital output: LED lit while the switch rests in the right position.
pub const LED_RIGHT_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Linear actuator driver (DRV8871 H-bridge)
// ---------------------------------------------------------------------------

/// DRV8871 IN1: asserted alone drives the actuator toward the right stop.
pub const BRIDGE_IN1_GPIO: i32 = 21;
/// DRV8871 IN2: asserted alone drives the actuator toward the left stop.
pub const BRIDGE_IN2_GPIO: i32 = 22;
