//! Caja Server - multi-tenant register shift ledger
//!
//! Backend for the cash-register side of the POS platform: one shift per
//! business at a time, an append-only movement log while it is open, and a
//! transactional cash reconciliation at close.
//!
//! # Module structure
//!
//! ```text
//! caja-server/src/
//! ├── core/       # Config, state, HTTP bootstrap, watchdog
//! ├── auth/       # JWT verification, CurrentUser middleware
//! ├── api/        # HTTP routes and handlers
//! ├── db/         # SQLite pool, migrations, repositories
//! ├── reconcile/  # Pure cash reconciliation engine
//! └── utils/      # Errors, logging, validation, time helpers
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod reconcile;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
