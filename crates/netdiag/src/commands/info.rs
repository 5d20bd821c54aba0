//! One-shot info command handlers.

use serde::Serialize;

use netdiag_api::DiagnosticsClient;
use netdiag_core::present::{InterfaceStatsView, IspView, TelemetryView};
use netdiag_core::{CoreError, DiagnosticsApi, InterfaceStats, IspSnapshot, TelemetrySnapshot};

use crate::cli::{InfoArgs, InfoSection, OutputFormat};
use crate::config::OutputSettings;
use crate::error::CliError;
use crate::output;

/// Combined document for `info all` in structured formats.
#[derive(Serialize)]
struct InfoReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    network: Option<&'a TelemetrySnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    isp: Option<&'a IspSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    interface: Option<&'a InterfaceStats>,
}

pub async fn handle(
    client: &DiagnosticsClient,
    args: InfoArgs,
    settings: OutputSettings,
) -> Result<(), CliError> {
    let OutputSettings { format, color, quiet } = settings;
    match args.section {
        InfoSection::Network => {
            let snap = DiagnosticsApi::network_info(client).await?;
            let out = output::render_panel(format, &snap, &TelemetryView::from(&snap), color)?;
            output::print_output(&out, quiet);
            Ok(())
        }

        InfoSection::Isp => {
            let snap = DiagnosticsApi::isp_info(client).await?;
            let out = output::render_panel(format, &snap, &IspView::from(&snap), color)?;
            output::print_output(&out, quiet);
            Ok(())
        }

        InfoSection::Stats => {
            let stats = DiagnosticsApi::interface_stats(client).await?;
            let out =
                output::render_panel(format, &stats, &InterfaceStatsView::from(&stats), color)?;
            output::print_output(&out, quiet);
            Ok(())
        }

        InfoSection::All => handle_all(client, settings).await,
    }
}

/// Fetch all three panels concurrently. Whatever loaded is printed; the
/// first failure decides the exit status.
async fn handle_all(client: &DiagnosticsClient, settings: OutputSettings) -> Result<(), CliError> {
    let (network, isp, stats) = tokio::join!(
        DiagnosticsApi::network_info(client),
        DiagnosticsApi::isp_info(client),
        DiagnosticsApi::interface_stats(client),
    );

    let mut network = report("network info", network);
    let isp = report("ISP info", isp);
    let stats = report("interface stats", stats);

    if let (Ok(net), Ok(st)) = (&mut network, &stats) {
        net.interface.clone_from(&st.interface);
    }

    let OutputSettings { format, color, quiet } = settings;
    let out = match format {
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            let doc = InfoReport {
                network: network.as_ref().ok(),
                isp: isp.as_ref().ok(),
                interface: stats.as_ref().ok(),
            };
            if format == OutputFormat::Yaml {
                output::render_yaml(&doc)?
            } else {
                output::render_json(&doc, format == OutputFormat::JsonCompact)?
            }
        }
        OutputFormat::Table | OutputFormat::Plain => {
            let separator = if format == OutputFormat::Table { "\n\n" } else { "\n" };
            let mut panels = Vec::new();
            if let Ok(ref snap) = network {
                panels.push(output::render_panel(format, snap, &TelemetryView::from(snap), color)?);
            }
            if let Ok(ref snap) = isp {
                panels.push(output::render_panel(format, snap, &IspView::from(snap), color)?);
            }
            if let Ok(ref st) = stats {
                panels.push(output::render_panel(format, st, &InterfaceStatsView::from(st), color)?);
            }
            panels.join(separator)
        }
    };
    output::print_output(&out, quiet);

    network?;
    isp?;
    stats?;
    Ok(())
}

/// Log a failed panel on stderr, keeping the error for the exit status.
fn report<T>(what: &str, result: Result<T, CoreError>) -> Result<T, CoreError> {
    if let Err(ref e) = result {
        tracing::warn!(error = %e, "failed to load {what}");
        eprintln!("Failed to load {what}: {e}");
    }
    result
}
