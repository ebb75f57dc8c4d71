//! Core infrastructure
//!
//! Fundamental plumbing shared by every other module. Currently this is
//! just the logging layer.

pub mod logging;
