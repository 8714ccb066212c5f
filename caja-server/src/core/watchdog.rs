//! Stale shift watchdog
//!
//! Periodically scans for shifts that have been open longer than the
//! configured threshold (a cashier went home without the corte de caja) and
//! logs them for manual settlement. Read-only: closing always requires an
//! operator's physical count, so nothing is mutated here.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::core::ServerState;
use crate::db::repository::shift;

const SCAN_INTERVAL: Duration = Duration::from_secs(30 * 60);

pub struct StaleShiftWatchdog {
    state: ServerState,
    shutdown: CancellationToken,
}

impl StaleShiftWatchdog {
    pub fn new(state: ServerState, shutdown: CancellationToken) -> Self {
        Self { state, shutdown }
    }

    /// Main loop: scan on startup, then every `SCAN_INTERVAL`
    pub async fn run(self) {
        tracing::info!(
            "Stale shift watchdog started (threshold: {}h)",
            self.state.config.stale_shift_hours
        );

        self.scan().await;

        loop {
            tokio::select! {
                _ = tokio::time::sleep(SCAN_INTERVAL) => {
                    self.scan().await;
                }
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Stale shift watchdog received shutdown signal");
                    return;
                }
            }
        }
    }

    async fn scan(&self) {
        let threshold_millis = self.state.config.stale_shift_hours * 60 * 60 * 1000;
        let opened_before = shared::util::now_millis() - threshold_millis;

        match shift::find_stale(&self.state.pool, opened_before).await {
            Ok(shifts) if shifts.is_empty() => {
                tracing::debug!("No stale shifts detected");
            }
            Ok(shifts) => {
                for s in &shifts {
                    tracing::warn!(
                        shift_id = s.id,
                        business_id = s.business_id,
                        start_time = s.start_time,
                        "Shift open past threshold, settlement required"
                    );
                }
            }
            Err(e) => {
                tracing::error!("Failed to scan for stale shifts: {}", e);
            }
        }
    }
}
