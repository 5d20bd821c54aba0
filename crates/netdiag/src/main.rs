mod cli;
mod commands;
mod config;
mod error;
mod output;
mod sink;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use netdiag_api::DiagnosticsClient;

use crate::cli::{Cli, Command};
use crate::config::OutputSettings;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "netdiag", &mut std::io::stdout());
            Ok(())
        }

        // Config commands don't need a backend connection
        Command::Config(args) => {
            let cfg = netdiag_config::load_config()?;
            let settings = OutputSettings::resolve(&cli.global, &cfg);
            commands::config_cmd::handle(args, &cli.global, &cfg, settings)
        }

        // All other commands talk to the backend
        cmd => {
            let cfg = netdiag_config::load_config()?;
            let settings = OutputSettings::resolve(&cli.global, &cfg);
            let (transport, dashboard) = config::resolve_runtime(&cli.global, &cfg)?;
            tracing::debug!(backend = %transport.base_url, timeout = ?transport.timeout, "resolved backend");

            let client = DiagnosticsClient::new(transport)?;
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, client, dashboard, settings).await
        }
    }
}
