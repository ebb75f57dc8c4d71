//! Mock platform implementation for testing
//!
//! This module provides mock implementations of the platform traits so
//! the control core can be exercised on a host without hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```ignore
//! use pico_beacon::platform::mock::MockUart;
//! use pico_beacon::platform::traits::UartInterface;
//!
//! let mut uart = MockUart::new();
//! uart.inject_rx_data(b"OK");
//!
//! let mut buf = [0u8; 8];
//! let count = uart.read(&mut buf).unwrap();
//! assert_eq!(&buf[..count], b"OK");
//! ```

#![cfg(any(test, feature = "mock"))]

mod gpio;
mod i2c;
mod timer;
mod uart;

pub use gpio::MockGpio;
pub use i2c::{I2cTransaction, MockI2c};
pub use timer::MockTimer;
pub use uart::MockUart;
