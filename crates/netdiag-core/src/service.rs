// ── Backend service seam ──
//
// The orchestrator talks to the backend only through `DiagnosticsApi`, so
// tests can substitute a scripted double for the HTTP client.

use std::future::Future;

use netdiag_api::DiagnosticsClient;

use crate::error::CoreError;
use crate::model::{InterfaceStats, IspSnapshot, SpeedTestResult, TelemetrySnapshot};

/// The four backend operations the dashboard needs.
///
/// Futures must be `Send` so the orchestrator can drive them from spawned
/// tasks.
pub trait DiagnosticsApi: Send + Sync + 'static {
    fn network_info(&self) -> impl Future<Output = Result<TelemetrySnapshot, CoreError>> + Send;

    fn isp_info(&self) -> impl Future<Output = Result<IspSnapshot, CoreError>> + Send;

    fn interface_stats(&self) -> impl Future<Output = Result<InterfaceStats, CoreError>> + Send;

    fn speed_test(&self) -> impl Future<Output = Result<SpeedTestResult, CoreError>> + Send;
}

impl DiagnosticsApi for DiagnosticsClient {
    async fn network_info(&self) -> Result<TelemetrySnapshot, CoreError> {
        Ok(DiagnosticsClient::network_info(self).await?.into())
    }

    async fn isp_info(&self) -> Result<IspSnapshot, CoreError> {
        Ok(DiagnosticsClient::isp_info(self).await?.into())
    }

    async fn interface_stats(&self) -> Result<InterfaceStats, CoreError> {
        Ok(DiagnosticsClient::interface_stats(self).await?.into())
    }

    async fn speed_test(&self) -> Result<SpeedTestResult, CoreError> {
        Ok(DiagnosticsClient::speed_test(self).await?.into())
    }
}
