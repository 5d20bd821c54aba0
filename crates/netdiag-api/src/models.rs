// Wire types for the diagnostic backend's JSON payloads.
//
// Field names follow the backend verbatim. The backend is loose about
// types: byte counters arrive as numeric strings and coordinates as either
// numbers, numeric strings, or the "N/A" sentinel. The deserializers here
// absorb that looseness so consumers only ever see typed values.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Sentinel the backend uses for an unknown coordinate.
pub const NOT_AVAILABLE: &str = "N/A";

/// `GET /api/network-info`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkInfo {
    pub ipv4: Option<String>,
    pub ipv6: Option<String>,
    pub gateway: Option<String>,
    pub dns1: Option<String>,
    pub dns2: Option<String>,
}

/// `GET /api/isp-info`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct IspInfo {
    pub isp: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub timezone: Option<String>,
    pub latitude: Option<Coordinate>,
    pub longitude: Option<Coordinate>,
}

/// `GET /api/interface-stats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct InterfaceStatsInfo {
    pub interface: Option<String>,
    #[serde(default, deserialize_with = "de_byte_count")]
    pub bytes_sent: u64,
    #[serde(default, deserialize_with = "de_byte_count")]
    pub bytes_received: u64,
}

/// `GET /api/speed-test`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpeedTestResponse {
    pub download_mbps: f64,
    pub upload_mbps: f64,
    pub ping_ms: f64,
    /// Unix seconds at which the backend ran the test.
    #[serde(default)]
    pub test_time: Option<i64>,
}

// ── Coordinate ──────────────────────────────────────────────────────

/// A latitude or longitude as reported by the backend.
///
/// `NotAvailable` is the backend's explicit "N/A"; an absent field is
/// modelled one level up as `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coordinate {
    Degrees(f64),
    NotAvailable,
}

impl Coordinate {
    /// The numeric value, if the backend knew it.
    pub fn degrees(self) -> Option<f64> {
        match self {
            Self::Degrees(v) => Some(v),
            Self::NotAvailable => None,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Degrees(v) => write!(f, "{v}"),
            Self::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Degrees(v) => serializer.serialize_f64(*v),
            Self::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CoordinateVisitor;

        impl Visitor<'_> for CoordinateVisitor {
            type Value = Coordinate;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number, a numeric string, or \"N/A\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Coordinate, E> {
                Ok(Coordinate::Degrees(v))
            }

            #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Coordinate, E> {
                Ok(Coordinate::Degrees(v as f64))
            }

            #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Coordinate, E> {
                Ok(Coordinate::Degrees(v as f64))
            }

            // Anything that isn't a number is treated as unknown: the
            // backend emits "N/A" but also "" when geolocation fails.
            fn visit_str<E: de::Error>(self, v: &str) -> Result<Coordinate, E> {
                Ok(v.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|d| d.is_finite())
                    .map_or(Coordinate::NotAvailable, Coordinate::Degrees))
            }
        }

        deserializer.deserialize_any(CoordinateVisitor)
    }
}

// ── Byte counters ───────────────────────────────────────────────────

/// Accept a byte counter as a JSON integer or a numeric string.
fn de_byte_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    struct ByteCountVisitor;

    impl Visitor<'_> for ByteCountVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or numeric string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
            u64::try_from(v).map_err(|_| E::custom(format!("negative byte count: {v}")))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
            v.trim()
                .parse::<u64>()
                .map_err(|_| E::custom(format!("invalid byte count: {v:?}")))
        }
    }

    deserializer.deserialize_any(ByteCountVisitor)
}
