//! Bridges `GlobalOpts` onto `netdiag-config`: flag overrides, profile
//! selection, and the output settings that fall back to `[defaults]`.

use std::io::{self, IsTerminal};
use std::time::Duration;

use clap::ValueEnum;

use netdiag_api::TransportConfig;
use netdiag_config::{Config, Overrides, Profile};
use netdiag_core::DashboardConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// How results should be written, after flags and config are merged.
#[derive(Debug, Clone, Copy)]
pub struct OutputSettings {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl OutputSettings {
    /// Flag first, then `[defaults]`, then the built-in default.
    pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Self {
        let format = global
            .output
            .or_else(|| OutputFormat::from_str(&cfg.defaults.output, true).ok())
            .unwrap_or(OutputFormat::Table);
        let color_mode = global
            .color
            .or_else(|| ColorMode::from_str(&cfg.defaults.color, true).ok())
            .unwrap_or(ColorMode::Auto);
        Self {
            format,
            color: should_color(color_mode),
            quiet: global.quiet,
        }
    }
}

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Active profile name from `--profile` and the config.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    cfg.active_profile_name(global.profile.as_deref())
}

/// Build the runtime configs from the config file, profile, and flags.
///
/// An explicitly requested profile must exist. Otherwise a missing
/// profile falls back to the built-in one (`http://localhost:8080`), so
/// `--backend` alone is enough to run without a config file.
pub fn resolve_runtime(
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(TransportConfig, DashboardConfig), CliError> {
    let profile_name = active_profile_name(global, cfg);
    let fallback = Profile::default();

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile,
        None if global.profile.is_some() => {
            let available = cfg.profile_names();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        None => {
            tracing::debug!(profile = %profile_name, "profile not configured; using built-in defaults");
            &fallback
        }
    };

    let overrides = Overrides {
        backend: global.backend.clone(),
        timeout: global.timeout.map(Duration::from_secs),
        refresh_interval: global.refresh,
        insecure: global.insecure,
    };
    Ok(netdiag_config::resolve_profile(
        profile,
        &cfg.defaults,
        &overrides,
    )?)
}
