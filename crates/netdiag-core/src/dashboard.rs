// ── Dashboard orchestrator ──
//
// Owns the application state, sequences the initial parallel load, runs
// the background refresh, and drives speed-test sessions. Backend and
// render sink are injected; every error is caught here and turned into a
// notification, nothing propagates to the caller.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::model::SpeedTestResult;
use crate::progress::{COMPLETE, ProgressEstimator};
use crate::service::DiagnosticsApi;
use crate::sink::RenderSink;

pub const LABEL_STARTING: &str = "Initializing test...";
pub const LABEL_COMPLETE: &str = "Test complete!";
pub const MSG_SPEED_TEST_OK: &str = "Speed test completed successfully!";
pub const MSG_ISP_UPDATED: &str = "ISP info updated";

// ── DashboardState ───────────────────────────────────────────────

/// Observable orchestrator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum DashboardState {
    Idle,
    LoadingInitial,
    SpeedTesting,
}

/// How a [`Dashboard::start_speed_test`] call ended.
#[derive(Debug)]
pub enum SpeedTestOutcome {
    /// Another session was already active; nothing happened.
    Ignored,
    Completed(SpeedTestResult),
    /// Already reported through the sink; returned for callers that need
    /// an exit status.
    Failed(CoreError),
}

impl SpeedTestOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

// ── Dashboard ────────────────────────────────────────────────────

/// The orchestrator.
///
/// Cheaply cloneable via `Arc<DashboardInner>`. Clones share state, so a
/// clone handed to a UI event handler sees the same busy flags as the
/// refresh task.
pub struct Dashboard<A, S> {
    inner: Arc<DashboardInner<A, S>>,
}

impl<A, S> Clone for Dashboard<A, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct DashboardInner<A, S> {
    api: A,
    sink: Arc<S>,
    config: DashboardConfig,
    /// Sole mutual-exclusion flag between speed tests and the refresh.
    speed_test_active: AtomicBool,
    loading: AtomicBool,
    state: watch::Sender<DashboardState>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl<A: DiagnosticsApi, S: RenderSink> DashboardInner<A, S> {
    fn current_state(&self) -> DashboardState {
        if self.speed_test_active.load(Ordering::Acquire) {
            DashboardState::SpeedTesting
        } else if self.loading.load(Ordering::Acquire) {
            DashboardState::LoadingInitial
        } else {
            DashboardState::Idle
        }
    }

    fn publish_state(&self) {
        let next = self.current_state();
        self.state.send_if_modified(|state| {
            if *state == next {
                return false;
            }
            debug!(from = %state, to = %next, "dashboard state");
            *state = next;
            true
        });
    }

    /// Leave SpeedTesting. Idempotent.
    fn end_speed_test(&self) {
        if self.speed_test_active.swap(false, Ordering::AcqRel) {
            self.sink.set_speed_test_control_enabled(true);
            self.publish_state();
        }
    }
}

/// One speed-test attempt, from start to settle.
///
/// Dropping the session is the single teardown path: it stops the
/// estimator, hides the progress UI if still shown, and returns the
/// dashboard to its pre-test state, whether the test succeeded, failed,
/// or the driving future was dropped.
struct SpeedTestSession<A: DiagnosticsApi, S: RenderSink> {
    inner: Arc<DashboardInner<A, S>>,
    estimator: ProgressEstimator,
    progress_shown: bool,
}

impl<A: DiagnosticsApi, S: RenderSink> SpeedTestSession<A, S> {
    /// Hide the progress UI. Idempotent.
    fn hide_progress(&mut self) {
        if std::mem::take(&mut self.progress_shown) {
            self.inner.sink.show_progress(false);
        }
    }
}

impl<A: DiagnosticsApi, S: RenderSink> Drop for SpeedTestSession<A, S> {
    fn drop(&mut self) {
        self.hide_progress();
        self.inner.end_speed_test();
    }
}

impl<A: DiagnosticsApi, S: RenderSink> Dashboard<A, S> {
    /// Create a dashboard. Does not fetch anything; call
    /// [`start()`](Self::start) to load data and start the refresh.
    pub fn new(api: A, sink: Arc<S>, config: DashboardConfig) -> Self {
        let (state, _) = watch::channel(DashboardState::Idle);
        Self {
            inner: Arc::new(DashboardInner {
                api,
                sink,
                config,
                speed_test_active: AtomicBool::new(false),
                loading: AtomicBool::new(false),
                state,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &A {
        &self.inner.api
    }

    pub fn state(&self) -> DashboardState {
        *self.inner.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<DashboardState> {
        self.inner.state.subscribe()
    }

    pub fn is_speed_testing(&self) -> bool {
        self.inner.speed_test_active.load(Ordering::Acquire)
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Enable the speed-test control, run the initial load, then spawn
    /// the background refresh.
    pub async fn start(&self) {
        self.inner.sink.set_speed_test_control_enabled(true);
        self.load_initial().await;

        let period = self.inner.config.refresh_interval;
        if period.is_zero() {
            debug!("background refresh disabled");
            return;
        }
        let handle = tokio::spawn(refresh_task(
            self.clone(),
            period,
            self.inner.cancel.child_token(),
        ));
        self.inner.task_handles.lock().await.push(handle);
        info!(?period, "background refresh scheduled");
    }

    /// Stop background tasks and wait for them to exit.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("dashboard stopped");
    }

    // ── Informational loads ──────────────────────────────────────

    /// Fetch network info, ISP info and interface stats concurrently.
    ///
    /// Each failure is reported on its own; the others still render.
    /// Returns once all three have settled.
    pub async fn load_initial(&self) {
        self.inner.loading.store(true, Ordering::Release);
        self.inner.publish_state();
        self.inner.sink.set_busy(true);

        let (network, isp, stats) = tokio::join!(
            self.refresh_network_info(),
            self.refresh_isp_info(),
            self.refresh_interface_stats(),
        );
        debug!(network, isp, stats, "initial load settled");

        self.inner.sink.set_busy(false);
        self.inner.loading.store(false, Ordering::Release);
        self.inner.publish_state();
    }

    /// Returns `true` if a fresh snapshot was rendered.
    pub async fn refresh_network_info(&self) -> bool {
        match self.inner.api.network_info().await {
            Ok(snapshot) => {
                self.inner.sink.render_telemetry(&snapshot);
                true
            }
            Err(e) => {
                self.report_failure("network info", &e);
                false
            }
        }
    }

    pub async fn refresh_isp_info(&self) -> bool {
        match self.inner.api.isp_info().await {
            Ok(snapshot) => {
                self.inner.sink.render_isp(&snapshot);
                self.inner.sink.notify_success(MSG_ISP_UPDATED);
                true
            }
            Err(e) => {
                self.report_failure("ISP info", &e);
                false
            }
        }
    }

    pub async fn refresh_interface_stats(&self) -> bool {
        match self.inner.api.interface_stats().await {
            Ok(stats) => {
                self.inner.sink.render_interface_stats(&stats);
                true
            }
            Err(e) => {
                self.report_failure("interface stats", &e);
                false
            }
        }
    }

    /// One background refresh cycle: network info and interface stats.
    ///
    /// Runs only while Idle: a speed test or an in-flight initial load
    /// skips the cycle. Results that arrive after a speed test has started
    /// are dropped unrendered. Returns `false` if the cycle was skipped.
    pub async fn background_refresh(&self) -> bool {
        let state = self.inner.current_state();
        if state != DashboardState::Idle {
            debug!(%state, "dashboard busy; skipping background refresh");
            return false;
        }

        let (network, stats) = tokio::join!(
            self.inner.api.network_info(),
            self.inner.api.interface_stats(),
        );

        if self.is_speed_testing() {
            debug!("speed test started during refresh; discarding results");
            return true;
        }
        match network {
            Ok(snapshot) => self.inner.sink.render_telemetry(&snapshot),
            Err(e) => self.report_failure("network info", &e),
        }
        match stats {
            Ok(stats) => self.inner.sink.render_interface_stats(&stats),
            Err(e) => self.report_failure("interface stats", &e),
        }
        true
    }

    fn report_failure(&self, what: &str, err: &CoreError) {
        warn!(error = %err, "failed to load {what}");
        self.inner
            .sink
            .notify_error(&format!("Failed to load {what}: {err}"));
    }

    // ── Speed test ───────────────────────────────────────────────

    /// Run one speed-test session to completion.
    ///
    /// A call while another session is active returns
    /// [`SpeedTestOutcome::Ignored`] without touching any state.
    pub async fn start_speed_test(&self) -> SpeedTestOutcome {
        let inner = &self.inner;
        if inner
            .speed_test_active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("speed test already running; ignoring start request");
            return SpeedTestOutcome::Ignored;
        }
        inner.publish_state();
        inner.sink.set_speed_test_control_enabled(false);
        inner.sink.show_progress(true);
        inner.sink.set_progress(0.0, Some(LABEL_STARTING));
        info!("speed test started");

        let mut session = SpeedTestSession {
            inner: Arc::clone(inner),
            estimator: ProgressEstimator::start(
                Arc::clone(&inner.sink),
                &inner.config.progress,
                StdRng::from_os_rng(),
            ),
            progress_shown: true,
        };

        match inner.api.speed_test().await {
            Ok(result) => {
                session.estimator.complete().await;
                inner.sink.set_progress(COMPLETE, Some(LABEL_COMPLETE));
                inner.sink.render_speed_result(&result);
                info!(
                    download_mbps = result.download_mbps,
                    upload_mbps = result.upload_mbps,
                    ping_ms = result.ping_ms,
                    "speed test complete"
                );

                linger(inner.config.completion_linger).await;
                session.hide_progress();
                inner.sink.notify_success(MSG_SPEED_TEST_OK);
                drop(session);
                SpeedTestOutcome::Completed(result)
            }
            Err(e) => {
                session.estimator.stop().await;
                warn!(error = %e, "speed test failed");
                inner.sink.notify_error(&format!("Speed test failed: {e}"));
                session.hide_progress();
                drop(session);
                SpeedTestOutcome::Failed(e)
            }
        }
    }
}

async fn linger(period: Duration) {
    if !period.is_zero() {
        tokio::time::sleep(period).await;
    }
}

/// Periodically refresh network info and interface stats.
async fn refresh_task<A: DiagnosticsApi, S: RenderSink>(
    dashboard: Dashboard<A, S>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                dashboard.background_refresh().await;
            }
        }
    }
}
