//! Actuator safety controller — DRV8871 H-bridge sequencing.
//!
//! Drives the two bridge inputs through a timed, non-blocking state
//! machine advanced by the cooperative loop:
//!
//! ```text
//!   Idle ──start_move──▶ DeadTime (both low, 10 ms)
//!                            │
//!                            ▼
//!                        Driving (one input asserted, 1100 ms)
//!                            │
//!                            ▼
//!                        Idle (coast, position committed)
//! ```
//!
//! ## Safety contract
//!
//! IN1 and IN2 are never asserted simultaneously — the only writes this
//! controller issues are `(0,0)`, `(1,0)` and `(0,1)`, and every direction
//! change passes through the both-low dead-time window first.  This is the
//! shoot-through guard for the bridge.
//!
//! Motion is open-loop: the travel time is fixed and not sensor-confirmed.
//! There is no failure path and no cancellation — a started move always
//! runs to completion.  A move to the already-current position runs the
//! full sequence; there is no short-circuit.

use log::info;
use serde::{Deserialize, Serialize};

use crate::app::ports::MotorPort;

/// Authoritative state of the physical switch mechanism.
///
/// Externally the switch is always in exactly one of these positions;
/// the in-flight phases of a move are internal to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchPosition {
    Left,
    Right,
}

impl SwitchPosition {
    /// Wire representation ("left" / "right").
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl core::fmt::Display for SwitchPosition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Internal move phase.  `since_ms` is the monotonic timestamp at which
/// the phase was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MovePhase {
    Idle,
    DeadTime { target: SwitchPosition, since_ms: u64 },
    Driving { target: SwitchPosition, since_ms: u64 },
}

/// Sequences the motor-driver inputs and owns the authoritative position.
pub struct ActuatorSafetyController {
    phase: MovePhase,
    position: SwitchPosition,
    dead_time_ms: u64,
    run_time_ms: u64,
}

impl ActuatorSafetyController {
    pub fn new(initial: SwitchPosition, dead_time_ms: u64, run_time_ms: u64) -> Self {
        Self {
            phase: MovePhase::Idle,
            position: initial,
            dead_time_ms,
            run_time_ms,
        }
    }

    /// Put the bridge into coast at power-on.  Call once before the loop.
    pub fn init(&self, motor: &mut impl MotorPort) {
        motor.set_bridge(false, false);
    }

    /// Confirmed physical position.  Only updated after a completed move.
    pub fn position(&self) -> SwitchPosition {
        self.position
    }

    /// True while a move sequence is in flight.
    pub fn is_moving(&self) -> bool {
        self.phase != MovePhase::Idle
    }

    /// Begin a move sequence toward `target`.
    ///
    /// Returns `false` (and does nothing) if a move is already in flight.
    /// The full coast → dead-time → drive → coast sequence runs even when
    /// `target` equals the current position.
    pub fn start_move(
        &mut self,
        target: SwitchPosition,
        now_ms: u64,
        motor: &mut impl MotorPort,
    ) -> bool {
        if self.is_moving() {
            return false;
        }
        // Coast first; the direction pair is asserted only after dead-time.
        motor.set_bridge(false, false);
        self.phase = MovePhase::DeadTime {
            target,
            since_ms: now_ms,
        };
        info!("actuator: move -> {} started", target);
        true
    }

    /// Advance the move sequence.  Returns `Some(position)` on the tick
    /// that completes a move, after the position has been committed.
    pub fn tick(&mut self, now_ms: u64, motor: &mut impl MotorPort) -> Option<SwitchPosition> {
        match self.phase {
            MovePhase::Idle => None,
            MovePhase::DeadTime { target, since_ms } => {
                if now_ms.saturating_sub(since_ms) >= self.dead_time_ms {
                    // Bridge has fully released; assert exactly one input.
                    match target {
                        SwitchPosition::Right => motor.set_bridge(true, false),
                        SwitchPosition::Left => motor.set_bridge(false, true),
                    }
                    self.phase = MovePhase::Driving {
                        target,
                        since_ms: now_ms,
                    };
                }
                None
            }
            MovePhase::Driving { target, since_ms } => {
                if now_ms.saturating_sub(since_ms) >= self.run_time_ms {
                    motor.set_bridge(false, false);
                    self.phase = MovePhase::Idle;
                    self.position = target;
                    info!("actuator: move -> {} complete", target);
                    Some(target)
                } else {
                    None
                }
            }
        }
    }
}
