// netdiag-api: Async Rust client for the network diagnostic backend

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{DiagnosticsClient, RequestOptions, endpoints};
pub use error::Error;
pub use models::{Coordinate, InterfaceStatsInfo, IspInfo, NetworkInfo, SpeedTestResponse};
pub use transport::{TlsMode, TransportConfig};
