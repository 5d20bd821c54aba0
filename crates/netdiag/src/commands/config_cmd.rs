//! Config subcommand handlers.

use netdiag_config::{self as config, Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::OutputSettings;
use crate::error::CliError;
use crate::output;

pub fn handle(
    args: ConfigArgs,
    global: &GlobalOpts,
    cfg: &Config,
    settings: OutputSettings,
) -> Result<(), CliError> {
    match args.command {
        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init { name, force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let profile = Profile {
                backend: global
                    .backend
                    .clone()
                    .unwrap_or_else(|| config::DEFAULT_BACKEND.into()),
                timeout: global.timeout,
                ..Profile::default()
            };

            // Validate before writing anything.
            config::resolve_profile(&profile, &cfg.defaults, &config::Overrides::default())?;

            let mut fresh = Config {
                default_profile: Some(name.clone()),
                ..Config::default()
            };
            fresh.profiles.insert(name.clone(), profile);
            config::save_config_to(&fresh, &path)?;

            if !settings.quiet {
                eprintln!("✓ Configuration written to {}", path.display());
                eprintln!("  Active profile: {name}");
                eprintln!("\n  Test it: netdiag info");
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let out = match settings.format {
                OutputFormat::Json => output::render_json(cfg, false)?,
                OutputFormat::JsonCompact => output::render_json(cfg, true)?,
                OutputFormat::Yaml => output::render_yaml(cfg)?,
                OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(cfg)?,
            };
            output::print_output(out.trim_end(), settings.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}
