// ── Progress estimator ──
//
// The backend reports a speed test only once it is finished. While the
// call is in flight the estimator animates a plausible progress value:
// random steps on a fixed tick, frozen at a ceiling below 100 so it never
// claims completion on its own. The owning session stops it exactly once
// and then forces it to 100.

use std::sync::Arc;

use rand::Rng;
use rand::rngs::StdRng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use crate::config::ProgressConfig;
use crate::sink::RenderSink;

/// Percentage reported once the real result is in.
pub const COMPLETE: f64 = 100.0;

/// Displayed progress of one session.
///
/// The value only ever grows and stays within `[0, 100]`. Before
/// [`complete`](Self::complete) it never exceeds the ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    displayed: f64,
    ceiling: f64,
}

impl Progress {
    pub fn new(ceiling: f64) -> Self {
        Self {
            displayed: 0.0,
            ceiling: ceiling.clamp(0.0, COMPLETE),
        }
    }

    pub fn displayed(&self) -> f64 {
        self.displayed
    }

    pub fn is_complete(&self) -> bool {
        self.displayed >= COMPLETE
    }

    /// Step forward by `increment`, capped at the ceiling.
    ///
    /// Returns `false` (and leaves the value alone) once the ceiling is
    /// reached or for a non-positive increment.
    pub fn advance(&mut self, increment: f64) -> bool {
        if self.displayed >= self.ceiling || increment.is_nan() || increment <= 0.0 {
            return false;
        }
        self.displayed = (self.displayed + increment).min(self.ceiling);
        true
    }

    /// Jump to 100.
    pub fn complete(&mut self) {
        self.displayed = COMPLETE;
    }
}

/// Draw one increment from `(0, max]`.
fn draw_increment(rng: &mut StdRng, max: f64) -> f64 {
    if max.is_nan() || max <= 0.0 {
        return 0.0;
    }
    max - rng.random_range(0.0..max)
}

/// Handle to a running estimator loop.
///
/// The loop runs as its own task and paints each step through the sink.
/// [`stop`](Self::stop) is idempotent; dropping the handle also stops
/// the loop.
pub struct ProgressEstimator {
    state: Arc<watch::Sender<Progress>>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ProgressEstimator {
    /// Spawn the tick loop. The first step lands one tick after start.
    pub fn start<S: RenderSink>(sink: Arc<S>, config: &ProgressConfig, rng: StdRng) -> Self {
        let state = Arc::new(watch::Sender::new(Progress::new(config.ceiling)));
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(tick_task(
            Arc::clone(&state),
            sink,
            config.clone(),
            rng,
            cancel.clone(),
        ));
        Self {
            state,
            cancel,
            handle: Some(handle),
        }
    }

    /// Current displayed value.
    pub fn displayed(&self) -> f64 {
        self.state.borrow().displayed()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop the loop and wait for it to exit. Never interrupts a tick in
    /// progress; a second call returns immediately.
    pub async fn stop(&mut self) -> f64 {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "progress task ended abnormally");
            }
        }
        self.displayed()
    }

    /// Stop the loop and force the value to 100.
    pub async fn complete(&mut self) -> f64 {
        self.stop().await;
        self.state.send_modify(Progress::complete);
        COMPLETE
    }
}

impl Drop for ProgressEstimator {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn tick_task<S: RenderSink>(
    state: Arc<watch::Sender<Progress>>,
    sink: Arc<S>,
    config: ProgressConfig,
    mut rng: StdRng,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(config.tick);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let increment = draw_increment(&mut rng, config.max_increment);
                let mut displayed = None;
                state.send_if_modified(|p| {
                    let moved = p.advance(increment);
                    if moved {
                        displayed = Some(p.displayed());
                    }
                    moved
                });
                if let Some(value) = displayed {
                    trace!(progress = value, "progress tick");
                    sink.set_progress(value, None);
                }
            }
        }
    }
}
