// ── Wire → domain conversion ──
//
// The backend reports missing strings as "" as often as it omits them;
// both collapse to `None` here. Negative or non-finite measurements are
// clamped to zero.

use chrono::DateTime;

use netdiag_api::{InterfaceStatsInfo, IspInfo, NetworkInfo, SpeedTestResponse};

use crate::model::{InterfaceStats, IspSnapshot, SpeedTestResult, TelemetrySnapshot};

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == v.len() {
            Some(v)
        } else {
            Some(trimmed.to_owned())
        }
    })
}

fn measurement(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

impl From<NetworkInfo> for TelemetrySnapshot {
    fn from(info: NetworkInfo) -> Self {
        Self {
            ipv4: non_empty(info.ipv4),
            ipv6: non_empty(info.ipv6),
            gateway: non_empty(info.gateway),
            dns1: non_empty(info.dns1),
            dns2: non_empty(info.dns2),
            interface: None,
        }
    }
}

impl From<IspInfo> for IspSnapshot {
    fn from(info: IspInfo) -> Self {
        Self {
            provider: non_empty(info.isp),
            country: non_empty(info.country),
            city: non_empty(info.city),
            timezone: non_empty(info.timezone),
            latitude: info.latitude,
            longitude: info.longitude,
        }
    }
}

impl From<InterfaceStatsInfo> for InterfaceStats {
    fn from(info: InterfaceStatsInfo) -> Self {
        Self {
            interface: non_empty(info.interface),
            bytes_sent: info.bytes_sent,
            bytes_received: info.bytes_received,
        }
    }
}

impl From<SpeedTestResponse> for SpeedTestResult {
    fn from(resp: SpeedTestResponse) -> Self {
        Self {
            download_mbps: measurement(resp.download_mbps),
            upload_mbps: measurement(resp.upload_mbps),
            ping_ms: measurement(resp.ping_ms),
            tested_at: resp
                .test_time
                .filter(|t| *t > 0)
                .and_then(|t| DateTime::from_timestamp(t, 0)),
        }
    }
}
