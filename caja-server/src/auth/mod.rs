//! Authentication module
//!
//! Token *verification* only: the identity service issues JWTs, this server
//! validates them and injects [`CurrentUser`] (operator + tenant) into every
//! request. No credential storage or session issuance lives here.

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
