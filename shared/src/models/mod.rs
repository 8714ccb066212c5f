//! Data models
//!
//! Shared between caja-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps Unix millis.

pub mod movement;
pub mod sale;
pub mod shift;

// Re-exports
pub use movement::*;
pub use sale::*;
pub use shift::*;
