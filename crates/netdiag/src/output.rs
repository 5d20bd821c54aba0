//! Output formatting: table, JSON, YAML, plain.
//!
//! Every panel has two shapes: the raw domain snapshot (serialized for
//! JSON and YAML) and its presentation view (a field/value table for
//! humans, `key<TAB>value` lines for scripts).

use std::io::{self, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use netdiag_core::present::{InterfaceStatsView, IspView, SpeedResultView, TelemetryView};

use crate::cli::OutputFormat;
use crate::error::CliError;

// ── Panel fields ─────────────────────────────────────────────────────

/// A presentation view that can be laid out as labelled fields.
pub trait Fields {
    fn title(&self) -> &'static str;

    /// `(plain key, table label, value)` triples in display order.
    fn fields(&self) -> Vec<(&'static str, &'static str, String)>;
}

impl Fields for TelemetryView {
    fn title(&self) -> &'static str {
        "Network"
    }

    fn fields(&self) -> Vec<(&'static str, &'static str, String)> {
        vec![
            ("ipv4", "IPv4", self.ipv4.clone()),
            ("ipv6", "IPv6", self.ipv6.clone()),
            ("gateway", "Gateway", self.gateway.clone()),
            ("dns1", "DNS 1", self.dns1.clone()),
            ("dns2", "DNS 2", self.dns2.clone()),
        ]
    }
}

impl Fields for IspView {
    fn title(&self) -> &'static str {
        "ISP"
    }

    fn fields(&self) -> Vec<(&'static str, &'static str, String)> {
        let mut fields = vec![
            ("isp", "Provider", self.provider.clone()),
            ("country", "Country", self.country.clone()),
            ("city", "City", self.city.clone()),
            ("timezone", "Timezone", self.timezone.clone()),
            ("coordinates", "Coordinates", self.coordinates.clone()),
        ];
        if let Some(ref url) = self.map_url {
            fields.push(("map_url", "Map", url.clone()));
        }
        fields
    }
}

impl Fields for InterfaceStatsView {
    fn title(&self) -> &'static str {
        "Interface"
    }

    fn fields(&self) -> Vec<(&'static str, &'static str, String)> {
        vec![
            ("interface", "Interface", self.interface.clone()),
            ("bytes_sent", "Sent", self.bytes_sent.clone()),
            ("bytes_received", "Received", self.bytes_received.clone()),
        ]
    }
}

impl Fields for SpeedResultView {
    fn title(&self) -> &'static str {
        "Speed Test"
    }

    fn fields(&self) -> Vec<(&'static str, &'static str, String)> {
        let mut fields = vec![
            ("download_mbps", "Download", format!("{} Mbps", self.download)),
            ("upload_mbps", "Upload", format!("{} Mbps", self.upload)),
            ("ping_ms", "Ping", format!("{} ms", self.ping)),
        ];
        if let Some(ref at) = self.tested_at {
            fields.push(("tested_at", "Tested", at.clone()));
        }
        fields
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Render one panel in the chosen format.
///
/// - `table`: a titled field/value table built from `view`
/// - `json` / `json-compact` / `yaml`: `raw` via serde
/// - `plain`: `key<TAB>value`, one field per line
pub fn render_panel<T, V>(
    format: OutputFormat,
    raw: &T,
    view: &V,
    color: bool,
) -> Result<String, CliError>
where
    T: Serialize + ?Sized,
    V: Fields,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<FieldRow> = view
                .fields()
                .into_iter()
                .map(|(_, field, value)| FieldRow { field, value })
                .collect();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{table}", heading(view.title(), color)))
        }
        OutputFormat::Json => render_json(raw, false),
        OutputFormat::JsonCompact => render_json(raw, true),
        OutputFormat::Yaml => render_yaml(raw),
        OutputFormat::Plain => Ok(view
            .fields()
            .into_iter()
            .map(|(key, _, value)| format!("{key}\t{value}"))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Panel heading, bold when color is on.
pub fn heading(title: &str, color: bool) -> String {
    if color {
        title.bold().cyan().to_string()
    } else {
        title.to_owned()
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(out)
}

pub fn render_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}
