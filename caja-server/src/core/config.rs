//! Server configuration

use std::path::PathBuf;

use chrono_tz::Tz;

use crate::auth::JwtConfig;

/// Server configuration, loaded from environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/caja | Database + log storage |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | TIMEZONE | America/Mexico_City | Business timezone for date filters |
/// | LOG_LEVEL | info | tracing level |
/// | JWT_SECRET | (dev fallback) | HMAC secret shared with the identity service |
/// | STALE_SHIFT_HOURS | 16 | Watchdog threshold for forgotten open shifts |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Running environment: development | staging | production
    pub environment: String,
    /// Business timezone used to interpret report date filters
    pub timezone: Tz,
    /// tracing level
    pub log_level: String,
    /// JWT verification config
    pub jwt: JwtConfig,
    /// A shift open longer than this is flagged by the watchdog
    pub stale_shift_hours: i64,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        let timezone = std::env::var("TIMEZONE")
            .unwrap_or_else(|_| "America/Mexico_City".into())
            .parse()
            .unwrap_or_else(|e| {
                tracing::warn!("Invalid TIMEZONE: {e}, falling back to UTC");
                chrono_tz::UTC
            });

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/caja".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            timezone,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            jwt: JwtConfig::default(),
            stale_shift_hours: std::env::var("STALE_SHIFT_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(16),
        }
    }

    /// Create the work directory layout if missing
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join("caja.db")
    }

    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
