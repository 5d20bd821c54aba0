//! Client-side orchestration between `netdiag-api` and a presentation layer.
//!
//! - **[`Dashboard`]**: the orchestrator. [`start()`](Dashboard::start)
//!   runs the three informational fetches concurrently, then schedules a
//!   background refresh that stays out of the way of speed tests.
//!   [`start_speed_test()`](Dashboard::start_speed_test) runs one session
//!   under an is-active guard; a second start while one runs is ignored.
//!
//! - **[`ProgressEstimator`]**: a cancellable tick loop that animates
//!   speed-test progress up to a ceiling while the real call is pending.
//!
//! - **[`DiagnosticsApi`] / [`RenderSink`]**: the two injected seams. The
//!   HTTP client implements the former; UIs (and test doubles) implement
//!   the latter.
//!
//! - **Domain model** ([`model`]) and **presentation** ([`present`]):
//!   immutable snapshots and the shared formatting of their fields.

pub mod config;
pub mod convert;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod present;
pub mod progress;
pub mod service;
pub mod sink;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DashboardConfig, ProgressConfig};
pub use dashboard::{Dashboard, DashboardState, SpeedTestOutcome};
pub use error::CoreError;
pub use model::{Coordinate, InterfaceStats, IspSnapshot, SpeedTestResult, TelemetrySnapshot};
pub use progress::{Progress, ProgressEstimator};
pub use service::DiagnosticsApi;
pub use sink::RenderSink;
