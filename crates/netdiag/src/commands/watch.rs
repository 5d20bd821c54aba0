//! Live dashboard: initial load, background refresh, and line commands
//! read from stdin until `q` or Ctrl-C.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{debug, info};

use netdiag_api::DiagnosticsClient;
use netdiag_core::{Dashboard, DashboardConfig};

use crate::config::OutputSettings;
use crate::error::CliError;
use crate::sink::TerminalSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchCommand {
    SpeedTest,
    Refresh,
    Quit,
}

fn parse_command(line: &str) -> Option<WatchCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "s" | "speed" | "speed-test" => Some(WatchCommand::SpeedTest),
        "r" | "refresh" => Some(WatchCommand::Refresh),
        "q" | "quit" | "exit" => Some(WatchCommand::Quit),
        _ => None,
    }
}

pub async fn handle(
    client: DiagnosticsClient,
    config: DashboardConfig,
    settings: OutputSettings,
) -> Result<(), CliError> {
    let sink = Arc::new(TerminalSink::new(settings).interactive(true));
    let dashboard = Dashboard::new(client, sink, config);
    dashboard.start().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut actions = JoinSet::new();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted; stopping dashboard");
                break;
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    // Input closed: keep refreshing until Ctrl-C.
                    debug!("stdin closed");
                    stdin_open = false;
                    continue;
                };
                match parse_command(&line) {
                    Some(WatchCommand::SpeedTest) => {
                        if dashboard.is_speed_testing() {
                            eprintln!("A speed test is already running");
                            continue;
                        }
                        let d = dashboard.clone();
                        actions.spawn(async move {
                            d.start_speed_test().await;
                        });
                    }
                    Some(WatchCommand::Refresh) => {
                        let d = dashboard.clone();
                        actions.spawn(async move { d.load_initial().await });
                    }
                    Some(WatchCommand::Quit) => break,
                    None if line.trim().is_empty() => {}
                    None => eprintln!("Unknown command '{}' (s, r, q)", line.trim()),
                }
            }
            Some(_) = actions.join_next(), if !actions.is_empty() => {}
        }
    }

    actions.shutdown().await;
    dashboard.shutdown().await;
    Ok(())
}
