//! Clients for the services the monitor talks to
//!
//! - [`page`]: Plain text fetches of the vanilla site, FX build and lobby server
//! - [`discord`]: Discord REST API for notifications and the status board
//! - [`github`]: GitHub Actions API for the rebuild workflow
//! - [`error`]: Error type shared by all clients

pub mod discord;
pub mod error;
pub mod github;
pub mod page;

/// User agent sent with every request
pub const USER_AGENT: &str = "fx-status-checker";
