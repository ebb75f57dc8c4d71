//! Timer interface trait
//!
//! This module defines the timing and delay interface that platform
//! implementations must provide.

use crate::platform::Result;

/// Timer interface trait
///
/// Platform implementations must provide this interface for timing and
/// delays. Delays are the only suspension points in the firmware; once a
/// delay begins it always completes.
///
/// # Safety Invariants
///
/// - Timer peripheral must be initialized before use
/// - Millisecond-level precision required
/// - Monotonic time source (never goes backwards)
pub trait TimerInterface {
    /// Delay for the specified number of milliseconds
    ///
    /// Blocks execution for at least `ms` milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Timer` if the delay operation fails.
    fn delay_ms(&mut self, ms: u32) -> Result<()>;

    /// Get current time in milliseconds
    ///
    /// Returns a monotonic timestamp in milliseconds since platform
    /// initialization.
    fn now_ms(&self) -> u64;
}
