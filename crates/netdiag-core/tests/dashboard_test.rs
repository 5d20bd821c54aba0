#![allow(clippy::unwrap_used)]

// Integration tests for the Dashboard orchestrator.
//
// A scripted DiagnosticsApi stands in for the HTTP client and a recording
// RenderSink captures every call in order. Time is paused so the refresh
// period, the estimator ticks and the completion linger run instantly.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use pretty_assertions::assert_eq;

use netdiag_core::dashboard::{LABEL_COMPLETE, LABEL_STARTING, MSG_ISP_UPDATED, MSG_SPEED_TEST_OK};
use netdiag_core::present::{InterfaceStatsView, IspView, SpeedResultView};
use netdiag_core::{
    Coordinate, CoreError, Dashboard, DashboardConfig, DashboardState, DiagnosticsApi,
    InterfaceStats, IspSnapshot, RenderSink, SpeedTestOutcome, SpeedTestResult,
    TelemetrySnapshot,
};

// ── Scripted backend ────────────────────────────────────────────────

struct FakeApi {
    fail_network: AtomicBool,
    fail_isp: AtomicBool,
    fail_stats: AtomicBool,
    fail_speed: AtomicBool,
    /// Latency of the three informational endpoints.
    fetch_delay: Duration,
    /// Latency of the speed test.
    speed_delay: Duration,
    network_calls: AtomicUsize,
    isp_calls: AtomicUsize,
    stats_calls: AtomicUsize,
    speed_calls: AtomicUsize,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            fail_network: AtomicBool::new(false),
            fail_isp: AtomicBool::new(false),
            fail_stats: AtomicBool::new(false),
            fail_speed: AtomicBool::new(false),
            fetch_delay: Duration::ZERO,
            speed_delay: Duration::from_secs(2),
            network_calls: AtomicUsize::new(0),
            isp_calls: AtomicUsize::new(0),
            stats_calls: AtomicUsize::new(0),
            speed_calls: AtomicUsize::new(0),
        }
    }
}

impl FakeApi {
    fn network_calls(&self) -> usize {
        self.network_calls.load(Ordering::SeqCst)
    }

    fn stats_calls(&self) -> usize {
        self.stats_calls.load(Ordering::SeqCst)
    }

    fn isp_calls(&self) -> usize {
        self.isp_calls.load(Ordering::SeqCst)
    }

    fn speed_calls(&self) -> usize {
        self.speed_calls.load(Ordering::SeqCst)
    }

    async fn latency(&self) {
        if !self.fetch_delay.is_zero() {
            tokio::time::sleep(self.fetch_delay).await;
        }
    }
}

fn unavailable() -> CoreError {
    CoreError::Http {
        status: 503,
        status_text: "Service Unavailable".into(),
    }
}

fn acme_isp() -> IspSnapshot {
    IspSnapshot {
        provider: Some("Acme".into()),
        country: Some("Wonderland".into()),
        city: Some("Springfield".into()),
        timezone: Some("UTC".into()),
        latitude: Some(Coordinate::NotAvailable),
        longitude: Some(Coordinate::NotAvailable),
    }
}

impl DiagnosticsApi for FakeApi {
    async fn network_info(&self) -> Result<TelemetrySnapshot, CoreError> {
        self.network_calls.fetch_add(1, Ordering::SeqCst);
        self.latency().await;
        if self.fail_network.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(TelemetrySnapshot {
            ipv4: Some("10.0.0.5".into()),
            gateway: Some("10.0.0.1".into()),
            dns1: Some("1.1.1.1".into()),
            ..TelemetrySnapshot::default()
        })
    }

    async fn isp_info(&self) -> Result<IspSnapshot, CoreError> {
        self.isp_calls.fetch_add(1, Ordering::SeqCst);
        self.latency().await;
        if self.fail_isp.load(Ordering::SeqCst) {
            return Err(CoreError::Timeout { timeout_ms: 30_000 });
        }
        Ok(acme_isp())
    }

    async fn interface_stats(&self) -> Result<InterfaceStats, CoreError> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        self.latency().await;
        if self.fail_stats.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(InterfaceStats {
            interface: Some("eth0".into()),
            bytes_sent: 2048,
            bytes_received: 4096,
        })
    }

    async fn speed_test(&self) -> Result<SpeedTestResult, CoreError> {
        self.speed_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.speed_delay).await;
        if self.fail_speed.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(SpeedTestResult {
            download_mbps: 87.3,
            upload_mbps: 12.1,
            ping_ms: 14.2,
            tested_at: None,
        })
    }
}

// ── Recording sink ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Telemetry(TelemetrySnapshot),
    Isp(IspSnapshot),
    Stats(InterfaceStats),
    Speed(SpeedTestResult),
    Progress(f64, Option<String>),
    ShowProgress(bool),
    Busy(bool),
    Control(bool),
    Error(String),
    Success(String),
}

#[derive(Default)]
struct Recorder(Mutex<Vec<Event>>);

impl Recorder {
    fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Error(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }

    fn last_control(&self) -> Option<bool> {
        self.events().into_iter().rev().find_map(|e| match e {
            Event::Control(enabled) => Some(enabled),
            _ => None,
        })
    }

    fn last_visibility(&self) -> Option<bool> {
        self.events().into_iter().rev().find_map(|e| match e {
            Event::ShowProgress(visible) => Some(visible),
            _ => None,
        })
    }
}

impl RenderSink for Recorder {
    fn render_telemetry(&self, snapshot: &TelemetrySnapshot) {
        self.push(Event::Telemetry(snapshot.clone()));
    }
    fn render_isp(&self, snapshot: &IspSnapshot) {
        self.push(Event::Isp(snapshot.clone()));
    }
    fn render_interface_stats(&self, stats: &InterfaceStats) {
        self.push(Event::Stats(stats.clone()));
    }
    fn render_speed_result(&self, result: &SpeedTestResult) {
        self.push(Event::Speed(result.clone()));
    }
    fn set_progress(&self, percent: f64, label: Option<&str>) {
        self.push(Event::Progress(percent, label.map(str::to_owned)));
    }
    fn show_progress(&self, visible: bool) {
        self.push(Event::ShowProgress(visible));
    }
    fn set_busy(&self, busy: bool) {
        self.push(Event::Busy(busy));
    }
    fn set_speed_test_control_enabled(&self, enabled: bool) {
        self.push(Event::Control(enabled));
    }
    fn notify_error(&self, message: &str) {
        self.push(Event::Error(message.to_owned()));
    }
    fn notify_success(&self, message: &str) {
        self.push(Event::Success(message.to_owned()));
    }
}

fn dashboard_with(api: FakeApi) -> (Dashboard<FakeApi, Recorder>, Arc<Recorder>) {
    let sink = Arc::new(Recorder::default());
    let dashboard = Dashboard::new(api, Arc::clone(&sink), DashboardConfig::default());
    (dashboard, sink)
}

fn is_telemetry(e: &Event) -> bool {
    matches!(e, Event::Telemetry(_))
}

fn is_stats(e: &Event) -> bool {
    matches!(e, Event::Stats(_))
}

// ── Initial load ────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn initial_load_renders_every_panel() {
    let (dashboard, sink) = dashboard_with(FakeApi::default());

    dashboard.load_initial().await;

    let events = sink.events();
    assert_eq!(events.first(), Some(&Event::Busy(true)));
    assert_eq!(events.last(), Some(&Event::Busy(false)));
    assert!(sink.errors().is_empty());

    let telemetry = events.iter().find_map(|e| match e {
        Event::Telemetry(t) => Some(t.clone()),
        _ => None,
    });
    assert_eq!(telemetry.unwrap().ipv4.as_deref(), Some("10.0.0.5"));

    let isp = events.iter().find_map(|e| match e {
        Event::Isp(i) => Some(i.clone()),
        _ => None,
    });
    assert_eq!(isp.unwrap().provider.as_deref(), Some("Acme"));

    let stats = events.iter().find_map(|e| match e {
        Event::Stats(s) => Some(s.clone()),
        _ => None,
    });
    let view = InterfaceStatsView::from(&stats.unwrap());
    assert_eq!(view.interface, "eth0");
    assert_eq!(view.bytes_sent, "2 KB");
    assert_eq!(view.bytes_received, "4 KB");

    assert_eq!(sink.count(|e| *e == Event::Success(MSG_ISP_UPDATED.into())), 1);
    assert_eq!(dashboard.state(), DashboardState::Idle);
}

#[tokio::test(start_paused = true)]
async fn isp_without_coordinates_has_no_map() {
    let (dashboard, sink) = dashboard_with(FakeApi::default());

    assert!(dashboard.refresh_isp_info().await);

    let isp = sink
        .events()
        .into_iter()
        .find_map(|e| match e {
            Event::Isp(i) => Some(i),
            _ => None,
        })
        .unwrap();
    let view = IspView::from(&isp);
    assert_eq!(view.coordinates, "N/A, N/A");
    assert_eq!(view.map_url, None);
}

#[tokio::test(start_paused = true)]
async fn initial_fetches_run_concurrently() {
    let api = FakeApi {
        fetch_delay: Duration::from_secs(1),
        ..FakeApi::default()
    };
    let (dashboard, _sink) = dashboard_with(api);

    let started = tokio::time::Instant::now();
    dashboard.load_initial().await;
    assert!(started.elapsed() < Duration::from_millis(1_500));
}

#[tokio::test(start_paused = true)]
async fn one_failed_fetch_does_not_block_the_others() {
    let api = FakeApi::default();
    api.fail_isp.store(true, Ordering::SeqCst);
    let (dashboard, sink) = dashboard_with(api);

    dashboard.load_initial().await;

    assert_eq!(sink.errors(), vec!["Failed to load ISP info: Request timeout"]);
    assert_eq!(sink.count(is_telemetry), 1);
    assert_eq!(sink.count(is_stats), 1);
    assert_eq!(sink.count(|e| matches!(e, Event::Isp(_))), 0);
    assert_eq!(sink.events().last(), Some(&Event::Busy(false)));
}

#[tokio::test(start_paused = true)]
async fn every_failure_is_reported_separately() {
    let api = FakeApi::default();
    api.fail_network.store(true, Ordering::SeqCst);
    api.fail_isp.store(true, Ordering::SeqCst);
    api.fail_stats.store(true, Ordering::SeqCst);
    let (dashboard, sink) = dashboard_with(api);

    dashboard.load_initial().await;

    let mut errors = sink.errors();
    errors.sort();
    assert_eq!(
        errors,
        vec![
            "Failed to load ISP info: Request timeout",
            "Failed to load interface stats: API Error: 503 Service Unavailable",
            "Failed to load network info: API Error: 503 Service Unavailable",
        ]
    );
    assert_eq!(dashboard.state(), DashboardState::Idle);
}

// ── Speed test ──────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn successful_speed_test_runs_full_lifecycle() {
    let (dashboard, sink) = dashboard_with(FakeApi::default());

    let outcome = dashboard.start_speed_test().await;
    let SpeedTestOutcome::Completed(result) = outcome else {
        panic!("expected completion, got {outcome:?}");
    };
    let view = SpeedResultView::from(&result);
    assert_eq!(view.download, "87.3");
    assert_eq!(view.upload, "12.1");
    assert_eq!(view.ping, "14.2");

    let events = sink.events();
    assert_eq!(events[0], Event::Control(false));
    assert_eq!(events[1], Event::ShowProgress(true));
    assert_eq!(events[2], Event::Progress(0.0, Some(LABEL_STARTING.into())));

    let done = events
        .iter()
        .position(|e| *e == Event::Progress(100.0, Some(LABEL_COMPLETE.into())))
        .unwrap();
    let simulated: Vec<f64> = events[3..done]
        .iter()
        .filter_map(|e| match e {
            Event::Progress(p, None) => Some(*p),
            _ => None,
        })
        .collect();
    assert!(!simulated.is_empty());
    assert!(simulated.windows(2).all(|w| w[0] <= w[1]), "{simulated:?}");
    assert!(simulated.iter().all(|p| *p > 0.0 && *p <= 90.0), "{simulated:?}");

    assert_eq!(
        &events[done + 1..],
        &[
            Event::Speed(result),
            Event::ShowProgress(false),
            Event::Success(MSG_SPEED_TEST_OK.into()),
            Event::Control(true),
        ]
    );
    assert_eq!(dashboard.state(), DashboardState::Idle);
    assert!(!dashboard.is_speed_testing());
}

#[tokio::test(start_paused = true)]
async fn completed_progress_lingers_before_hiding() {
    let (dashboard, sink) = dashboard_with(FakeApi::default());

    let d = dashboard.clone();
    let run = tokio::spawn(async move { d.start_speed_test().await });

    // Result arrives at 2000ms; the bar stays up until 3500ms.
    tokio::time::sleep(Duration::from_millis(3_400)).await;
    assert_eq!(sink.count(|e| matches!(e, Event::Speed(_))), 1);
    assert_eq!(sink.last_visibility(), Some(true));
    assert!(dashboard.is_speed_testing());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(sink.last_visibility(), Some(false));
    assert!(!dashboard.is_speed_testing());
    assert!(matches!(run.await.unwrap(), SpeedTestOutcome::Completed(_)));
}

#[tokio::test(start_paused = true)]
async fn second_start_is_ignored_while_running() {
    let (dashboard, sink) = dashboard_with(FakeApi::default());

    let d = dashboard.clone();
    let first = tokio::spawn(async move { d.start_speed_test().await });
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(dashboard.state(), DashboardState::SpeedTesting);

    let before = sink.events().len();
    assert!(dashboard.start_speed_test().await.is_ignored());
    assert_eq!(sink.events().len(), before);

    assert!(matches!(first.await.unwrap(), SpeedTestOutcome::Completed(_)));
    assert_eq!(dashboard.api().speed_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_speed_test_restores_controls() {
    let api = FakeApi::default();
    api.fail_speed.store(true, Ordering::SeqCst);
    let (dashboard, sink) = dashboard_with(api);

    let outcome = dashboard.start_speed_test().await;
    let SpeedTestOutcome::Failed(err) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(err.status(), Some(503));

    assert_eq!(
        sink.errors(),
        vec!["Speed test failed: API Error: 503 Service Unavailable"]
    );
    assert_eq!(sink.count(|e| matches!(e, Event::Speed(_))), 0);
    assert_eq!(sink.count(|e| matches!(e, Event::Success(_))), 0);
    assert_eq!(sink.last_visibility(), Some(false));
    assert_eq!(sink.last_control(), Some(true));
    assert_eq!(dashboard.state(), DashboardState::Idle);

    // No progress ticks once the session has settled.
    let settled = sink.events().len();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(sink.events().len(), settled);

    // The guard is released: a new session starts.
    dashboard.api().fail_speed.store(false, Ordering::SeqCst);
    assert!(matches!(
        dashboard.start_speed_test().await,
        SpeedTestOutcome::Completed(_)
    ));
}

#[tokio::test(start_paused = true)]
async fn dropping_a_running_session_releases_the_guard() {
    let api = FakeApi {
        speed_delay: Duration::from_secs(60),
        ..FakeApi::default()
    };
    let (dashboard, sink) = dashboard_with(api);

    let cut = tokio::time::timeout(Duration::from_secs(1), dashboard.start_speed_test()).await;
    assert!(cut.is_err());

    assert!(!dashboard.is_speed_testing());
    assert_eq!(dashboard.state(), DashboardState::Idle);
    assert_eq!(sink.last_control(), Some(true));
    assert_eq!(sink.last_visibility(), Some(false));

    let settled = sink.events().len();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(sink.events().len(), settled);
}

#[tokio::test(start_paused = true)]
async fn speed_test_may_start_during_initial_load() {
    let api = FakeApi {
        fetch_delay: Duration::from_secs(1),
        ..FakeApi::default()
    };
    let (dashboard, _sink) = dashboard_with(api);

    let d = dashboard.clone();
    let load = tokio::spawn(async move { d.load_initial().await });
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(dashboard.state(), DashboardState::LoadingInitial);

    let d = dashboard.clone();
    let test = tokio::spawn(async move { d.start_speed_test().await });
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(dashboard.state(), DashboardState::SpeedTesting);

    load.await.unwrap();
    assert_eq!(dashboard.state(), DashboardState::SpeedTesting);
    assert!(matches!(test.await.unwrap(), SpeedTestOutcome::Completed(_)));
    assert_eq!(dashboard.state(), DashboardState::Idle);
}

// ── Background refresh ──────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn refresh_is_skipped_during_speed_test() {
    let (dashboard, sink) = dashboard_with(FakeApi::default());

    let d = dashboard.clone();
    let test = tokio::spawn(async move { d.start_speed_test().await });
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(!dashboard.background_refresh().await);
    assert_eq!(dashboard.api().network_calls(), 0);
    assert_eq!(dashboard.api().stats_calls(), 0);
    assert_eq!(sink.count(is_telemetry), 0);

    test.await.unwrap();
    assert!(dashboard.background_refresh().await);
    assert_eq!(sink.count(is_telemetry), 1);
    assert_eq!(sink.count(is_stats), 1);
}

#[tokio::test(start_paused = true)]
async fn refresh_is_skipped_during_initial_load() {
    let api = FakeApi {
        fetch_delay: Duration::from_secs(1),
        ..FakeApi::default()
    };
    let (dashboard, sink) = dashboard_with(api);

    let d = dashboard.clone();
    let load = tokio::spawn(async move { d.load_initial().await });
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(dashboard.state(), DashboardState::LoadingInitial);

    assert!(!dashboard.background_refresh().await);
    assert_eq!(dashboard.api().network_calls(), 1);
    assert_eq!(dashboard.api().stats_calls(), 1);

    load.await.unwrap();
    assert_eq!(sink.count(is_telemetry), 1);
    assert!(dashboard.background_refresh().await);
    assert_eq!(dashboard.api().network_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn refresh_results_are_dropped_if_a_test_starts_mid_fetch() {
    let api = FakeApi {
        fetch_delay: Duration::from_secs(1),
        ..FakeApi::default()
    };
    let (dashboard, sink) = dashboard_with(api);

    let d = dashboard.clone();
    let refresh = tokio::spawn(async move { d.background_refresh().await });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let d = dashboard.clone();
    let test = tokio::spawn(async move { d.start_speed_test().await });

    assert!(refresh.await.unwrap());
    assert_eq!(dashboard.api().network_calls(), 1);
    assert_eq!(sink.count(is_telemetry), 0);
    assert_eq!(sink.count(is_stats), 0);

    test.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn refresh_skips_isp_info() {
    let (dashboard, sink) = dashboard_with(FakeApi::default());

    assert!(dashboard.background_refresh().await);
    assert_eq!(dashboard.api().isp_calls(), 0);
    assert_eq!(sink.count(|e| matches!(e, Event::Isp(_))), 0);
}

#[tokio::test(start_paused = true)]
async fn scheduler_refreshes_every_period_until_shutdown() {
    let (dashboard, _sink) = dashboard_with(FakeApi::default());

    dashboard.start().await;
    assert_eq!(dashboard.api().network_calls(), 1);
    assert_eq!(dashboard.api().isp_calls(), 1);

    tokio::time::sleep(Duration::from_millis(29_900)).await;
    assert_eq!(dashboard.api().network_calls(), 1);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(dashboard.api().network_calls(), 2);
    assert_eq!(dashboard.api().stats_calls(), 2);
    assert_eq!(dashboard.api().isp_calls(), 1);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(dashboard.api().network_calls(), 3);

    dashboard.shutdown().await;
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(dashboard.api().network_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn zero_period_disables_scheduler() {
    let sink = Arc::new(Recorder::default());
    let config = DashboardConfig {
        refresh_interval: Duration::ZERO,
        ..DashboardConfig::default()
    };
    let dashboard = Dashboard::new(FakeApi::default(), Arc::clone(&sink), config);

    dashboard.start().await;
    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(dashboard.api().network_calls(), 1);
    assert_eq!(sink.events().first(), Some(&Event::Control(true)));
    dashboard.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn state_changes_are_observable() {
    let (dashboard, _sink) = dashboard_with(FakeApi::default());
    let mut rx = dashboard.subscribe_state();

    let d = dashboard.clone();
    let test = tokio::spawn(async move { d.start_speed_test().await });

    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), DashboardState::SpeedTesting);
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), DashboardState::Idle);

    test.await.unwrap();
    assert_eq!(DashboardState::SpeedTesting.to_string(), "speed-testing");
}
