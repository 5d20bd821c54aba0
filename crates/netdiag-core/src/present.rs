//! Human-readable presentation of snapshots.
//!
//! Sinks are free to paint however they like, but every sink needs the
//! same numbers formatted the same way. These view types carry the
//! display strings; sinks only decide where they go.

use serde::Serialize;

use crate::model::{InterfaceStats, IspSnapshot, SpeedTestResult, TelemetrySnapshot};

pub const NOT_AVAILABLE: &str = "Not available";
pub const UNAVAILABLE: &str = "Unavailable";
pub const UNKNOWN: &str = "Unknown";
pub const NO_COORDINATES: &str = "N/A, N/A";

/// Download speed that fills the gauge completely.
pub const GAUGE_MAX_MBPS: f64 = 200.0;

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count with binary units and at most two decimals.
///
/// `0 → "0 B"`, `2048 → "2 KB"`, `1536 → "1.5 KB"`.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".into();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", BYTE_UNITS[unit])
}

/// Round half away from zero to one decimal, shortest form.
///
/// `12.05 → "12.1"`, `87.3 → "87.3"`, `100.0 → "100"`.
pub fn round_one_decimal(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0 + 0.0;
    format!("{rounded}")
}

/// `"lat, lon"`, or `"N/A, N/A"` unless both are known.
pub fn coordinates_label(snapshot: &IspSnapshot) -> String {
    match snapshot.location() {
        Some((lat, lon)) => format!("{lat}, {lon}"),
        None => NO_COORDINATES.into(),
    }
}

/// OpenStreetMap embed URL centred on the location with a small bounding box.
pub fn map_embed_url(lat: f64, lon: f64) -> String {
    const SPAN: f64 = 0.05;
    format!(
        "https://www.openstreetmap.org/export/embed.html?bbox={:.4},{:.4},{:.4},{:.4}&layer=mapnik&marker={lat},{lon}",
        lon - SPAN,
        lat - SPAN,
        lon + SPAN,
        lat + SPAN,
    )
}

/// Share of the gauge filled by a download speed, capped at 100.
pub fn gauge_percent(download_mbps: f64) -> f64 {
    (download_mbps / GAUGE_MAX_MBPS * 100.0).clamp(0.0, 100.0)
}

fn or_fallback(value: Option<&String>, fallback: &str) -> String {
    value.map_or_else(|| fallback.to_owned(), Clone::clone)
}

// ── Views ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetryView {
    pub ipv4: String,
    pub ipv6: String,
    pub gateway: String,
    pub dns1: String,
    pub dns2: String,
}

impl From<&TelemetrySnapshot> for TelemetryView {
    fn from(s: &TelemetrySnapshot) -> Self {
        Self {
            ipv4: or_fallback(s.ipv4.as_ref(), UNAVAILABLE),
            ipv6: or_fallback(s.ipv6.as_ref(), NOT_AVAILABLE),
            gateway: or_fallback(s.gateway.as_ref(), UNAVAILABLE),
            dns1: or_fallback(s.dns1.as_ref(), UNAVAILABLE),
            dns2: or_fallback(s.dns2.as_ref(), UNAVAILABLE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IspView {
    pub provider: String,
    pub country: String,
    pub city: String,
    pub timezone: String,
    pub coordinates: String,
    /// Present only when both coordinates are numeric.
    pub map_url: Option<String>,
}

impl From<&IspSnapshot> for IspView {
    fn from(s: &IspSnapshot) -> Self {
        Self {
            provider: or_fallback(s.provider.as_ref(), UNKNOWN),
            country: or_fallback(s.country.as_ref(), UNKNOWN),
            city: or_fallback(s.city.as_ref(), UNKNOWN),
            timezone: or_fallback(s.timezone.as_ref(), UNKNOWN),
            coordinates: coordinates_label(s),
            map_url: s.location().map(|(lat, lon)| map_embed_url(lat, lon)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceStatsView {
    pub interface: String,
    pub bytes_sent: String,
    pub bytes_received: String,
}

impl From<&InterfaceStats> for InterfaceStatsView {
    fn from(s: &InterfaceStats) -> Self {
        Self {
            interface: or_fallback(s.interface.as_ref(), UNKNOWN),
            bytes_sent: format_bytes(s.bytes_sent),
            bytes_received: format_bytes(s.bytes_received),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedResultView {
    pub download: String,
    pub upload: String,
    pub ping: String,
    pub gauge_percent: f64,
    pub tested_at: Option<String>,
}

impl From<&SpeedTestResult> for SpeedResultView {
    fn from(r: &SpeedTestResult) -> Self {
        Self {
            download: round_one_decimal(r.download_mbps),
            upload: round_one_decimal(r.upload_mbps),
            ping: round_one_decimal(r.ping_ms),
            gauge_percent: gauge_percent(r.download_mbps),
            tested_at: r
                .tested_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        }
    }
}
