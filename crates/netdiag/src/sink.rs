//! Terminal render sink.
//!
//! Panels go to stdout in the selected output format. Progress, the busy
//! spinner and notifications go to stderr through one `MultiProgress`, so
//! piping stdout never captures terminal control sequences.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, warn};

use netdiag_core::RenderSink;
use netdiag_core::model::{InterfaceStats, IspSnapshot, SpeedTestResult, TelemetrySnapshot};
use netdiag_core::present::{InterfaceStatsView, IspView, SpeedResultView, TelemetryView};

use crate::config::OutputSettings;
use crate::output::{self, Fields};

const BAR_TEMPLATE: &str = "{spinner:.cyan} [{bar:40.cyan/blue}] {pos:>3}% {msg}";
const SPIN_TEMPLATE: &str = "{spinner:.cyan} {msg}";

pub struct TerminalSink {
    settings: OutputSettings,
    /// Print failures through the sink. Off when the caller reports the
    /// error itself (one-shot commands exit with a diagnostic).
    error_notices: bool,
    /// Show key hints when the speed-test control toggles.
    interactive: bool,
    multi: MultiProgress,
    progress: Mutex<Option<ProgressBar>>,
    busy: Mutex<Option<ProgressBar>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TerminalSink {
    pub fn new(settings: OutputSettings) -> Self {
        let multi = if settings.quiet {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        } else {
            MultiProgress::new()
        };
        Self {
            settings,
            error_notices: true,
            interactive: false,
            multi,
            progress: Mutex::new(None),
            busy: Mutex::new(None),
        }
    }

    pub fn with_error_notices(mut self, enabled: bool) -> Self {
        self.error_notices = enabled;
        self
    }

    pub fn interactive(mut self, enabled: bool) -> Self {
        self.interactive = enabled;
        self
    }

    fn panel<T: Serialize, V: Fields>(&self, raw: &T, view: &V) {
        match output::render_panel(self.settings.format, raw, view, self.settings.color) {
            Ok(out) => {
                let quiet = self.settings.quiet;
                self.multi.suspend(|| output::print_output(&out, quiet));
            }
            Err(e) => warn!(error = %e, panel = view.title(), "failed to render panel"),
        }
    }

    fn notice(&self, line: String) {
        self.multi.suspend(|| eprintln!("{line}"));
    }
}

impl RenderSink for TerminalSink {
    fn render_telemetry(&self, snapshot: &TelemetrySnapshot) {
        self.panel(snapshot, &TelemetryView::from(snapshot));
    }

    fn render_isp(&self, snapshot: &IspSnapshot) {
        self.panel(snapshot, &IspView::from(snapshot));
    }

    fn render_interface_stats(&self, stats: &InterfaceStats) {
        self.panel(stats, &InterfaceStatsView::from(stats));
    }

    fn render_speed_result(&self, result: &SpeedTestResult) {
        self.panel(result, &SpeedResultView::from(result));
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    fn set_progress(&self, percent: f64, label: Option<&str>) {
        if let Some(bar) = lock(&self.progress).as_ref() {
            bar.set_position(percent.clamp(0.0, 100.0).round() as u64);
            if let Some(label) = label {
                bar.set_message(label.to_owned());
            }
        }
    }

    fn show_progress(&self, visible: bool) {
        let mut slot = lock(&self.progress);
        if let Some(old) = slot.take() {
            old.finish_and_clear();
        }
        if visible {
            let bar = self.multi.add(ProgressBar::new(100));
            if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
                bar.set_style(style.progress_chars("=> "));
            }
            *slot = Some(bar);
        }
    }

    fn set_busy(&self, busy: bool) {
        let mut slot = lock(&self.busy);
        if let Some(old) = slot.take() {
            old.finish_and_clear();
        }
        if busy {
            let spinner = self.multi.add(ProgressBar::new_spinner());
            if let Ok(style) = ProgressStyle::with_template(SPIN_TEMPLATE) {
                spinner.set_style(style);
            }
            spinner.set_message("Loading...");
            spinner.enable_steady_tick(Duration::from_millis(120));
            *slot = Some(spinner);
        }
    }

    fn set_speed_test_control_enabled(&self, enabled: bool) {
        debug!(enabled, "speed test control");
        if self.interactive && enabled && !self.settings.quiet {
            let hint = "Commands: s = speed test, r = refresh, q = quit";
            if self.settings.color {
                self.notice(hint.dimmed().to_string());
            } else {
                self.notice(hint.to_owned());
            }
        }
    }

    fn notify_error(&self, message: &str) {
        if !self.error_notices {
            return;
        }
        if self.settings.color {
            self.notice(format!("{} {message}", "✗".red().bold()));
        } else {
            self.notice(format!("error: {message}"));
        }
    }

    fn notify_success(&self, message: &str) {
        if self.settings.quiet {
            return;
        }
        if self.settings.color {
            self.notice(format!("{} {message}", "✓".green().bold()));
        } else {
            self.notice(message.to_owned());
        }
    }
}
