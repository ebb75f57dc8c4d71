//! UART interface trait
//!
//! This module defines the UART communication interface that platform
//! implementations must provide.

use crate::platform::Result;

/// UART interface trait
///
/// Platform implementations must provide this interface for UART
/// communication.
///
/// Reads are single-shot: they hand over whatever the receive buffer
/// holds at the moment of the call and return immediately. Callers that
/// need "wait for a reply" semantics insert their own settle delay before
/// reading; nothing in this trait may block the caller indefinitely.
///
/// # Safety Invariants
///
/// - UART peripheral must be initialized before use
/// - Only one owner per UART peripheral instance
/// - No concurrent access to the same UART from multiple contexts
pub trait UartInterface {
    /// Write data to UART
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Uart` if the write operation fails.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Read whatever is currently buffered
    ///
    /// Copies up to `buffer.len()` bytes into the provided buffer and
    /// returns the number of bytes actually read. Returns 0 when nothing
    /// has arrived; never waits for more data.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Uart` if the read operation fails.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Check if data is available to read
    ///
    /// Returns `true` if at least one byte can be read without blocking.
    fn available(&self) -> bool;
}
