//! GPIO interface trait
//!
//! This module defines the binary output interface that platform
//! implementations must provide. The locator only drives indicator
//! outputs; input modes are a platform concern and not modeled here.

use crate::platform::Result;

/// GPIO output interface trait
///
/// # Safety Invariants
///
/// - GPIO pin must be initialized as an output before use
/// - Only one owner per GPIO pin instance
/// - No concurrent access to the same GPIO pin from multiple contexts
pub trait GpioInterface {
    /// Set GPIO pin high (logic level 1)
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio(GpioError::InvalidMode)` if the pin
    /// is not configured as an output.
    fn set_high(&mut self) -> Result<()>;

    /// Set GPIO pin low (logic level 0)
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio(GpioError::InvalidMode)` if the pin
    /// is not configured as an output.
    fn set_low(&mut self) -> Result<()>;

    /// Toggle GPIO pin state
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio(GpioError::InvalidMode)` if the pin
    /// is not configured as an output.
    fn toggle(&mut self) -> Result<()>;

    /// Read back the driven pin state
    ///
    /// Returns `true` if the pin is high, `false` if low.
    fn read(&self) -> bool;
}
