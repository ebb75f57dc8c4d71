//! Mock timer implementation for testing

use crate::platform::{traits::TimerInterface, Result};

/// Mock timer implementation
///
/// Keeps a simulated clock that only advances when a delay is requested,
/// so tests can account for every settle window without real sleeps.
#[derive(Debug, Default)]
pub struct MockTimer {
    now_ms: u64,
}

impl MockTimer {
    /// Create a new mock timer starting at zero
    pub fn new() -> Self {
        Self { now_ms: 0 }
    }
}

impl TimerInterface for MockTimer {
    fn delay_ms(&mut self, ms: u32) -> Result<()> {
        self.now_ms = self.now_ms.wrapping_add(u64::from(ms));
        Ok(())
    }

    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}
