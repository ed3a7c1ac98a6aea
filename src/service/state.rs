use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::classification::ThresholdTable;

/// Application state for the circuit test service
#[derive(Debug)]
pub struct ServiceState {
    /// Active thresholds, replaceable at runtime
    pub thresholds: ThresholdTable,
    pub started_at: DateTime<Utc>,

    // Bumped under the read lock, so it needs its own synchronisation
    classified: AtomicU64,
}

impl Default for ServiceState {
    fn default() -> Self {
        Self::new(ThresholdTable::default())
    }
}

impl ServiceState {
    pub fn new(thresholds: ThresholdTable) -> Self {
        Self {
            thresholds,
            started_at: Utc::now(),
            classified: AtomicU64::new(0),
        }
    }

    /// Number of readings classified since startup
    pub fn classified(&self) -> u64 {
        self.classified.load(Ordering::Relaxed)
    }

    pub fn record_classified(&self, count: u64) {
        self.classified.fetch_add(count, Ordering::Relaxed);
    }

    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

/// Thread-safe shared state
pub type SharedState = Arc<RwLock<ServiceState>>;

/// Create a new shared state instance with the built-in thresholds
pub fn create_shared_state() -> SharedState {
    create_shared_state_with(ThresholdTable::default())
}

/// Create a new shared state instance with the given thresholds
pub fn create_shared_state_with(thresholds: ThresholdTable) -> SharedState {
    Arc::new(RwLock::new(ServiceState::new(thresholds)))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_service_state_default() {
        let state = ServiceState::default();

        assert_eq!(state.thresholds, ThresholdTable::default());
        assert_eq!(state.classified(), 0);
        assert!(state.uptime_seconds() >= 0);
    }

    #[test]
    fn test_record_classified() {
        let state = ServiceState::default();

        state.record_classified(1);
        state.record_classified(5);

        assert_eq!(state.classified(), 6);
    }

    #[tokio::test]
    async fn test_shared_state() {
        let state = create_shared_state();

        // Write
        {
            let mut s = state.write().await;
            s.thresholds.r1r2.pass_max = dec!(0.5);
        }

        // Read
        {
            let s = state.read().await;
            assert_eq!(s.thresholds.r1r2.pass_max, dec!(0.5));
        }
    }

    #[tokio::test]
    async fn test_create_shared_state_with() {
        let mut table = ThresholdTable::default();
        table.rcd_trip_time.pass_max = dec!(40);
        table.rcd_trip_time.warning_max = dec!(40);

        let state = create_shared_state_with(table.clone());

        assert_eq!(state.read().await.thresholds, table);
    }
}
