// ── Domain model ──
//
// Immutable snapshots produced fresh on every successful fetch. A new
// snapshot replaces the previously rendered one; nothing here is ever
// mutated in place.

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use netdiag_api::Coordinate;

/// Addressing of the host the backend runs on.
///
/// Every field is optional: an unavailable value is normal, not an error.
/// `interface` is filled from interface stats, never from network info.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TelemetrySnapshot {
    pub ipv4: Option<String>,
    pub ipv6: Option<String>,
    pub gateway: Option<String>,
    pub dns1: Option<String>,
    pub dns2: Option<String>,
    pub interface: Option<String>,
}

/// Provider and geolocation of the public address.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IspSnapshot {
    pub provider: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub timezone: Option<String>,
    pub latitude: Option<Coordinate>,
    pub longitude: Option<Coordinate>,
}

impl IspSnapshot {
    /// Both coordinates, if the backend knew them.
    pub fn location(&self) -> Option<(f64, f64)> {
        let lat = self.latitude?.degrees()?;
        let lon = self.longitude?.degrees()?;
        Some((lat, lon))
    }
}

/// Cumulative traffic counters of the active interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceStats {
    pub interface: Option<String>,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

/// Final figures of one speed test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedTestResult {
    pub download_mbps: f64,
    pub upload_mbps: f64,
    pub ping_ms: f64,
    pub tested_at: Option<DateTime<Utc>>,
}
