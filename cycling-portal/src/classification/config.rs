//! Classification configuration.

use chrono::Duration;

/// Configuration parameters for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationConfig {
    /// Riders finishing less than this many milliseconds behind another
    /// rider in a mass-start stage are given that rider's time.
    pub same_time_gap_ms: i64,
}

impl ClassificationConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(same_time_gap_ms: i64) -> Self {
        Self { same_time_gap_ms }
    }

    /// Returns the same-time gap as a Duration.
    pub fn same_time_gap(&self) -> Duration {
        Duration::milliseconds(self.same_time_gap_ms)
    }
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            same_time_gap_ms: 1000, // 1 second
        }
    }
}
