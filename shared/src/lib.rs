//! Shared types for the Caja platform
//!
//! Data models exchanged between caja-server and its API clients,
//! plus small utilities (timestamps, ID generation).

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
