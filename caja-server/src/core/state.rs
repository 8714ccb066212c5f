//! Server state

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db;
use crate::utils::AppError;

/// Shared handles for every request handler.
///
/// Cheap to clone: the pool and the JWT service are reference-counted.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// JWT verification service
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Initialize: work directory layout, database pool + migrations, services
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_path();
        let pool = db::connect(&db_path.to_string_lossy()).await?;

        Ok(Self {
            config: config.clone(),
            pool,
            jwt_service: Arc::new(JwtService::new(&config.jwt)),
        })
    }
}
