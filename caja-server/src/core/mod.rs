//! Core module - server configuration, state and bootstrap
//!
//! - [`Config`] - environment-driven configuration
//! - [`ServerState`] - shared service handles
//! - [`Server`] - HTTP server
//! - [`StaleShiftWatchdog`] - background scan for forgotten open shifts

pub mod config;
pub mod server;
pub mod state;
pub mod watchdog;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
pub use watchdog::StaleShiftWatchdog;
