//! Output rendering: plain lines, table, JSON.

use std::io::{self, Write};

use tabled::{Table, Tabled, settings::Style};

use unidev_api::Device;

use crate::cli::OutputFormat;
use crate::error::CliError;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "MAC")]
    mac: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            model: d.model.clone(),
            mac: d.mac_address.clone(),
        }
    }
}

/// Render the device list in the chosen format.
///
/// An empty list renders as an empty string in plain and table modes.
pub fn render_devices(format: OutputFormat, devices: &[Device]) -> Result<String, CliError> {
    match format {
        OutputFormat::Plain => Ok(devices
            .iter()
            .map(plain_line)
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Table if devices.is_empty() => Ok(String::new()),
        OutputFormat::Table => {
            let rows: Vec<DeviceRow> = devices.iter().map(DeviceRow::from).collect();
            Ok(Table::new(rows).with(Style::rounded()).to_string())
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(devices)?),
    }
}

fn plain_line(d: &Device) -> String {
    format!(
        "ID: {}, Name: {}, Model: {}, MAC: {}",
        d.id, d.name, d.model, d.mac_address
    )
}

/// Print rendered output to stdout. Empty output prints nothing.
pub fn print_output(output: &str) -> Result<(), CliError> {
    if output.is_empty() {
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}")?;
    Ok(())
}
