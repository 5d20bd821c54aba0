//! Command dispatch: bridges CLI args -> dashboard/client -> output formatting.

pub mod config_cmd;
pub mod info;
pub mod watch;

use netdiag_api::DiagnosticsClient;
use netdiag_core::DashboardConfig;

use crate::cli::Command;
use crate::config::OutputSettings;
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: DiagnosticsClient,
    dashboard: DashboardConfig,
    settings: OutputSettings,
) -> Result<(), CliError> {
    match cmd {
        Command::Info(args) => info::handle(&client, args, settings).await,
        Command::SpeedTest => speed_test::handle(client, dashboard, settings).await,
        Command::Watch => watch::handle(client, dashboard, settings).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
