// ── Runtime dashboard configuration ──
//
// Timing knobs for the orchestrator and the progress estimator. Built by
// the CLI (or tests) and handed in; core never reads config files.

use std::time::Duration;

/// Tuning for the simulated speed-test progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressConfig {
    /// Interval between estimator ticks.
    pub tick: Duration,
    /// Upper bound of the random per-tick increment, in percent.
    pub max_increment: f64,
    /// The estimator never advances past this on its own.
    pub ceiling: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(300),
            max_increment: 15.0,
            ceiling: 90.0,
        }
    }
}

/// Configuration for a [`Dashboard`](crate::Dashboard).
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Background refresh period. Zero disables the scheduler.
    pub refresh_interval: Duration,
    /// How long the completed progress bar stays up after a successful test.
    pub completion_linger: Duration,
    pub progress: ProgressConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(30_000),
            completion_linger: Duration::from_millis(1_500),
            progress: ProgressConfig::default(),
        }
    }
}
