//! Switch-track firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod actuator;
pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod monitor;
pub mod pins;
pub mod protocol;
pub mod session;
pub mod telemetry;

// Adapter/driver modules compile on every target; the actual hardware
// calls are guarded by cfg attributes inside.
pub mod adapters;
pub mod drivers;
