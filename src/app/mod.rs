//! Application core — pure domain logic, zero I/O.
//!
//! This module wires the five controllers of the switch-track module
//! together: session lifecycle, command processing, actuator sequencing,
//! telemetry, and connectivity monitoring.  All interaction with hardware
//! and the network happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
