//! Shared configuration for the netdiag binary.
//!
//! TOML profiles layered with environment variables, and translation into
//! the runtime configs the client and the dashboard consume. Core never
//! reads files; it receives a pre-built `TransportConfig` and
//! `DashboardConfig` from here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use netdiag_api::{TlsMode, TransportConfig};
use netdiag_core::DashboardConfig;

/// Backend address used when neither a profile nor a flag names one.
pub const DEFAULT_BACKEND: &str = "http://localhost:8080";

/// Environment variable that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "NETDIAG_CONFIG";

const ENV_PREFIX: &str = "NETDIAG_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Active profile name: explicit choice, then `default_profile`,
    /// then `"default"`.
    pub fn active_profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    /// Profile names, sorted.
    pub fn profile_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Per-request deadline in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Background refresh period in seconds; 0 disables it.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            refresh_interval: default_refresh_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_refresh_interval() -> u64 {
    30
}

/// A named backend profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "http://192.168.1.10:8080").
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Override the default timeout (seconds).
    pub timeout: Option<u64>,

    /// Override the default refresh period (seconds).
    pub refresh_interval: Option<u64>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,

    /// Path to a custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            timeout: None,
            refresh_interval: None,
            insecure: None,
            ca_cert: None,
        }
    }
}

fn default_backend() -> String {
    DEFAULT_BACKEND.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `NETDIAG_CONFIG`, then platform
/// conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "netdiag", "netdiag").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netdiag");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from a specific file + environment. A missing file yields the
/// defaults.
///
/// Nested keys use a double underscore:
/// `NETDIAG_DEFAULTS__TIMEOUT=10`, `NETDIAG_PROFILES__LAB__BACKEND=...`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

/// Serialize config to TOML at `path`, creating parent directories.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

/// Command-line values that win over the profile.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend: Option<String>,
    pub timeout: Option<Duration>,
    pub refresh_interval: Option<Duration>,
    pub insecure: bool,
}

/// Translate a profile + defaults + overrides into runtime configs.
///
/// Precedence per field: override, then profile, then `[defaults]`.
pub fn resolve_profile(
    profile: &Profile,
    defaults: &Defaults,
    overrides: &Overrides,
) -> Result<(TransportConfig, DashboardConfig), ConfigError> {
    // 1. Backend URL
    let url_str = overrides.backend.as_deref().unwrap_or(&profile.backend);
    let url = parse_backend(url_str)?;

    // 2. TLS
    let tls = if overrides.insecure || profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    // 3. Timeout
    let timeout = overrides.timeout.unwrap_or_else(|| {
        Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout))
    });
    if timeout.is_zero() {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be greater than zero".into(),
        });
    }

    // 4. Refresh period
    let refresh_interval = overrides.refresh_interval.unwrap_or_else(|| {
        Duration::from_secs(
            profile
                .refresh_interval
                .unwrap_or(defaults.refresh_interval),
        )
    });

    let transport = TransportConfig::new(url).with_timeout(timeout).with_tls(tls);
    let dashboard = DashboardConfig {
        refresh_interval,
        ..DashboardConfig::default()
    };
    Ok((transport, dashboard))
}

fn parse_backend(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Validation {
        field: "backend".into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Validation {
            field: "backend".into(),
            reason: format!("expected an http or https URL, got scheme '{other}'"),
        }),
    }
}
