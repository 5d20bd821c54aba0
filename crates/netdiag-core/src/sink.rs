// ── Render sink ──
//
// Presentation collaborator consumed by the orchestrator. Calls are
// one-way and must not block: a sink paints, it never answers back.

use crate::model::{InterfaceStats, IspSnapshot, SpeedTestResult, TelemetrySnapshot};

/// Receives everything the dashboard wants shown.
///
/// Render calls may arrive in any relative order (the initial fetches run
/// concurrently), so implementations should update per field and treat a
/// repeated call with the same value as a no-op.
pub trait RenderSink: Send + Sync + 'static {
    fn render_telemetry(&self, snapshot: &TelemetrySnapshot);

    fn render_isp(&self, snapshot: &IspSnapshot);

    fn render_interface_stats(&self, stats: &InterfaceStats);

    fn render_speed_result(&self, result: &SpeedTestResult);

    /// Move the progress bar. `label` replaces the caption when present.
    fn set_progress(&self, percent: f64, label: Option<&str>);

    /// Show or hide the progress UI.
    fn show_progress(&self, visible: bool);

    /// Global loading indicator, on during the initial load.
    fn set_busy(&self, busy: bool);

    fn set_speed_test_control_enabled(&self, enabled: bool);

    fn notify_error(&self, message: &str);

    fn notify_success(&self, message: &str);
}
