//! Control-level subsystems
//!
//! Everything above the device drivers: fix retention, report
//! composition and the scheduler loop that ties the peripherals
//! together.

pub mod control;
pub mod fix_store;
pub mod reporter;
