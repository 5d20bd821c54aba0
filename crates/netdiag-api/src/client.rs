// Diagnostic backend HTTP client
//
// Wraps `reqwest::Client` with URL construction, a per-call deadline and
// the error taxonomy. The four endpoint methods are thin typed wrappers
// over `request`; all transport mechanics live in this file.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::Error;
use crate::models::{InterfaceStatsInfo, IspInfo, NetworkInfo, SpeedTestResponse};
use crate::transport::TransportConfig;

/// Backend endpoint paths, relative to the API prefix.
pub mod endpoints {
    pub const NETWORK_INFO: &str = "/network-info";
    pub const ISP_INFO: &str = "/isp-info";
    pub const INTERFACE_STATS: &str = "/interface-stats";
    pub const SPEED_TEST: &str = "/speed-test";
}

/// Per-call request options. Defaults to a bodiless `GET`.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    /// Extra headers; these override the defaults on conflict.
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl RequestOptions {
    pub fn post(body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        }
    }
}

/// HTTP client for the diagnostic backend.
///
/// Cheap to clone; the inner `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct DiagnosticsClient {
    http: reqwest::Client,
    config: TransportConfig,
}

impl DiagnosticsClient {
    /// Create a client, building a `reqwest::Client` from `config`.
    pub fn new(config: TransportConfig) -> Result<Self, Error> {
        let http = config.build_client()?;
        Ok(Self { http, config })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, config: TransportConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    // ── Core request ─────────────────────────────────────────────────

    /// Issue a request against `endpoint` and return the parsed JSON body.
    ///
    /// The deadline covers both sending and reading the body. When it
    /// elapses the in-flight future is dropped, which aborts the call, and
    /// the result is [`Error::Timeout`].
    pub async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<serde_json::Value, Error> {
        let url = self.config.endpoint_url(endpoint)?;
        debug!(method = %options.method, %url, "request");

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(options.headers);

        let mut builder = self.http.request(options.method, url).headers(headers);
        if let Some(ref body) = options.body {
            builder = builder.json(body);
        }

        let call = async {
            let resp = builder.send().await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(Error::Http {
                    status: status.as_u16(),
                    status_text: status.canonical_reason().unwrap_or_default().to_owned(),
                });
            }
            Ok::<_, Error>(resp.text().await?)
        };

        let body = match tokio::time::timeout(self.config.timeout, call).await {
            Ok(result) => result?,
            Err(_elapsed) => {
                let timeout_ms = u64::try_from(self.config.timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(endpoint, timeout_ms, "request deadline elapsed");
                return Err(Error::Timeout { timeout_ms });
            }
        };

        serde_json::from_str(&body).map_err(|e| {
            let preview = body.chars().take(200).collect::<String>();
            Error::Decode {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    /// `GET endpoint` and decode the JSON body into `T`.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, Error> {
        let value = self.request(endpoint, RequestOptions::default()).await?;
        T::deserialize(&value).map_err(|e| Error::Decode {
            message: e.to_string(),
            body: value.to_string(),
        })
    }

    // ── Endpoints ────────────────────────────────────────────────────

    pub async fn network_info(&self) -> Result<NetworkInfo, Error> {
        self.get(endpoints::NETWORK_INFO).await
    }

    pub async fn isp_info(&self) -> Result<IspInfo, Error> {
        self.get(endpoints::ISP_INFO).await
    }

    pub async fn interface_stats(&self) -> Result<InterfaceStatsInfo, Error> {
        self.get(endpoints::INTERFACE_STATS).await
    }

    /// Run a speed test on the backend. Blocks until the backend has
    /// measured; it reports no intermediate progress.
    pub async fn speed_test(&self) -> Result<SpeedTestResponse, Error> {
        self.get(endpoints::SPEED_TEST).await
    }
}
