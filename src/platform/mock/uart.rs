//! Mock UART implementation for testing

use crate::platform::{traits::UartInterface, Result};
use core::cell::RefCell;
use std::collections::VecDeque;
use std::vec::Vec;

/// Mock UART implementation
///
/// Transmitted bytes accumulate in an in-memory log for verification.
/// Received data is queued as frames: each `read` call returns (a prefix
/// of) a single injected frame, modelling "whatever the peer sent since
/// the last poll". Injecting an empty frame makes one read come back
/// empty even when later frames are queued, which is how tests script a
/// peer that stays silent for a few exchanges.
///
/// # Example
///
/// ```ignore
/// use pico_beacon::platform::mock::MockUart;
/// use pico_beacon::platform::traits::UartInterface;
///
/// let mut uart = MockUart::new();
/// uart.inject_rx_data(b"");
/// uart.inject_rx_data(b"OK");
///
/// let mut buf = [0u8; 8];
/// assert_eq!(uart.read(&mut buf).unwrap(), 0); // silent exchange
/// assert_eq!(uart.read(&mut buf).unwrap(), 2); // then an answer
/// ```
#[derive(Debug, Default)]
pub struct MockUart {
    tx_buffer: RefCell<Vec<u8>>,
    rx_frames: RefCell<VecDeque<Vec<u8>>>,
}

impl MockUart {
    /// Create a new mock UART
    pub fn new() -> Self {
        Self {
            tx_buffer: RefCell::new(Vec::new()),
            rx_frames: RefCell::new(VecDeque::new()),
        }
    }

    /// Get transmitted data (for test verification)
    pub fn tx_buffer(&self) -> Vec<u8> {
        self.tx_buffer.borrow().clone()
    }

    /// Clear transmit buffer
    pub fn clear_tx_buffer(&mut self) {
        self.tx_buffer.borrow_mut().clear();
    }

    /// Queue one receive frame (for test setup)
    ///
    /// Each call queues the frame a single `read` will return; an empty
    /// slice queues a silent exchange.
    pub fn inject_rx_data(&mut self, data: &[u8]) {
        self.rx_frames.borrow_mut().push_back(data.to_vec());
    }
}

impl UartInterface for MockUart {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.tx_buffer.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut frames = self.rx_frames.borrow_mut();
        let Some(frame) = frames.pop_front() else {
            return Ok(0);
        };

        let to_read = core::cmp::min(buffer.len(), frame.len());
        buffer[..to_read].copy_from_slice(&frame[..to_read]);
        if to_read < frame.len() {
            // leftover stays at the head for the next read
            frames.push_front(frame[to_read..].to_vec());
        }

        Ok(to_read)
    }

    fn available(&self) -> bool {
        self.rx_frames
            .borrow()
            .front()
            .is_some_and(|frame| !frame.is_empty())
    }
}
