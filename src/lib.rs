pub mod clients;
pub mod compat;
pub mod config;
pub mod logging;
pub mod monitor;
pub mod store;
