//! Compile-time configuration
//!
//! Destination number and timing constants. Pin and bus assignment is a
//! bring-up concern and lives with the platform implementation, not here.

/// Phone number that receives every location report
pub const DESTINATION_PHONE: &str = "+385919738960";

/// Steady-state scheduler tick
pub const POLL_TICK_MS: u32 = 100;

/// Heartbeat indicator half-period
pub const HEARTBEAT_INTERVAL_MS: u64 = 500;

/// Wait between network registration attempts at startup
pub const REGISTRATION_RETRY_MS: u32 = 3_000;

/// Settle delay for one-shot AT commands (registration, mailbox queries)
pub const COMMAND_SETTLE_MS: u32 = 5_000;

/// Settle delay after each SMS setup step
pub const SMS_STEP_SETTLE_MS: u32 = 1_000;

/// Settle delay after the SMS terminator byte; transmission happens here
pub const SMS_FINAL_SETTLE_MS: u32 = 3_000;

/// Cool-down between a delivered report and the mailbox cleanup
pub const SMS_CLEANUP_DELAY_MS: u32 = 5_000;
