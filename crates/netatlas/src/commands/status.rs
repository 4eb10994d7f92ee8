//! Device status table (`GET /status`).

use owo_colors::OwoColorize;
use tabled::Tabled;

use netatlas_config::Config;
use netatlas_core::{CoreError, Device, convert};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "LOCATION")]
    location: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "LAST SEEN")]
    last_seen: String,
}

fn to_row(device: &Device, color: bool) -> DeviceRow {
    let status = if color {
        if device.status.is_online() {
            device.status.green().to_string()
        } else {
            device.status.red().to_string()
        }
    } else {
        device.status.to_string()
    };

    DeviceRow {
        ip: device.ip.clone(),
        name: device.display_name().to_owned(),
        location: device.location.clone().unwrap_or_else(|| "-".into()),
        status,
        last_seen: device.last_seen.map_or_else(
            || "-".into(),
            |t| {
                t.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            },
        ),
    }
}

pub async fn handle(cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let client = util::build_client(global, cfg)?;
    let status = client
        .status()
        .await
        .map_err(|e| CliError::from(CoreError::from(e)))?;
    let devices = convert::devices_from_status(&status);

    let color = output::should_color(&global.color);
    let rendered = output::render_list(
        &global.output,
        &devices,
        |d| to_row(d, color),
        |d| d.ip.clone(),
    );
    output::print_output(&rendered, global.quiet);
    Ok(())
}
