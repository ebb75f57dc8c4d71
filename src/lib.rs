#![cfg_attr(not(any(test, feature = "mock")), no_std)]

//! pico_beacon - SMS-queried asset locator firmware
//!
//! Control core for a battery-powered tracker built around a GPS receiver,
//! a SIM800 cellular modem and a BQ27441 fuel gauge. Any inbound text
//! message is answered with the device's current or last-known position
//! plus battery telemetry.

// Platform abstraction layer; all hardware-specific code stays behind it
pub mod platform;

// Device drivers using platform abstraction
pub mod devices;

// Core infrastructure (logging)
pub mod core;

// Control-level subsystems (fix store, reporting, scheduler loop)
pub mod subsystems;

// Compile-time configuration
pub mod config;
