//! Scheduled monitoring cycle
//!
//! # Modules
//!
//! - [`cycle`]: Runs one check end to end and reports failures
//! - [`rebuild`]: Dispatches the rebuild workflow and tracks manual-update alerts
//! - [`status_board`]: Renders the status embed and notification texts
//! - [`error`]: Errors that abort a cycle

pub mod cycle;
pub mod error;
pub mod rebuild;
pub mod status_board;

pub use cycle::{CycleReport, Monitor};
pub use error::MonitorError;
