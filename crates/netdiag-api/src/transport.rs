// Transport configuration for building the backend's reqwest::Client.
//
// Holds everything the client needs to address the backend and bound
// each call: base URL, API prefix, deadline, TLS mode.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::Error;

/// Fixed prefix under which the backend exposes every endpoint.
pub const API_PREFIX: &str = "/api";

/// Default per-request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

const USER_AGENT: &str = concat!("netdiag/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode for HTTPS backends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the bundled/system root store.
    #[default]
    System,
    /// Trust an additional CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (self-signed lab backends).
    DangerAcceptInvalid,
}

/// Shared transport configuration for the diagnostic client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub base_url: Url,
    pub api_prefix: String,
    pub timeout: Duration,
    pub tls: TlsMode,
}

impl TransportConfig {
    /// Config for `base_url` with the default prefix, deadline and TLS mode.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_prefix: API_PREFIX.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            tls: TlsMode::default(),
        }
    }

    /// Override the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the TLS mode.
    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }

    /// Join base URL, API prefix and endpoint path with single slashes.
    ///
    /// `http://host:8080/` + `/api` + `network-info` →
    /// `http://host:8080/api/network-info`
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let prefix = self.api_prefix.trim_matches('/');
        let endpoint = endpoint.trim_start_matches('/');
        let full = if prefix.is_empty() {
            format!("{base}/{endpoint}")
        } else {
            format!("{base}/{prefix}/{endpoint}")
        };
        Ok(Url::parse(&full)?)
    }

    /// Build a `reqwest::Client` from this config.
    ///
    /// The deadline is not installed on the client itself: the request
    /// wrapper owns it so that an elapsed deadline maps to
    /// [`Error::Timeout`] rather than a generic transport failure.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(base: &str) -> TransportConfig {
        TransportConfig::new(Url::parse(base).unwrap())
    }

    #[test]
    fn endpoint_url_joins_prefix_and_path() {
        let cfg = config("http://localhost:8080");
        let url = cfg.endpoint_url("/network-info").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/network-info");
    }

    #[test]
    fn endpoint_url_normalises_slashes() {
        let cfg = config("http://localhost:8080/");
        assert_eq!(
            cfg.endpoint_url("speed-test").unwrap().as_str(),
            "http://localhost:8080/api/speed-test"
        );
    }

    #[test]
    fn endpoint_url_keeps_base_path() {
        let cfg = config("https://lab.example.com/diag/");
        assert_eq!(
            cfg.endpoint_url("/isp-info").unwrap().as_str(),
            "https://lab.example.com/diag/api/isp-info"
        );
    }

    #[test]
    fn empty_prefix_is_skipped() {
        let mut cfg = config("http://localhost:8080");
        cfg.api_prefix = String::new();
        assert_eq!(
            cfg.endpoint_url("/interface-stats").unwrap().as_str(),
            "http://localhost:8080/interface-stats"
        );
    }

    #[test]
    fn defaults_match_backend_contract() {
        let cfg = config("http://localhost:8080");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.api_prefix, "/api");
        assert_eq!(cfg.tls, TlsMode::System);
    }

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let cfg = config("https://localhost")
            .with_tls(TlsMode::CustomCa(PathBuf::from("/nonexistent/ca.pem")));
        let err = cfg.build_client().unwrap_err();
        assert!(matches!(err, Error::Tls(_)), "got {err:?}");
    }
}
