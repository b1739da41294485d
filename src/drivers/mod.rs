//! Hardware drivers for the switch-track main board.
//!
//! Dumb actuator layer: every driver is a thin wrapper over raw GPIO
//! writes through [`hw_init`], with an in-memory shadow of the pin state
//! for host-target tests.  Sequencing and safety live in the domain
//! layer, never here.

pub mod bridge;
pub mod hw_init;
pub mod indicator;
