//! Device add/delete command handlers.
//!
//! Both commands mount the diagram first so the snapshot store is merged
//! before mutating, then tear it down; the layout change lands on disk
//! as part of the operation.

use std::time::Duration;

use netatlas_config::Config;
use netatlas_core::{AddOutcome, DeviceStatus, PendingDevice};

use crate::cli::{AddArgs, DeleteArgs, GlobalOpts};
use crate::error::CliError;

use super::util;

pub async fn add(cfg: &Config, global: &GlobalOpts, args: AddArgs) -> Result<(), CliError> {
    let diagram = util::build_diagram(global, cfg, Some(Duration::ZERO))?;
    diagram.mount().await;

    let result = diagram
        .add_device(PendingDevice {
            ip: args.ip.clone(),
            name: args.name,
            location: args.location,
            // The backend probes after registration; until then the
            // device is offline.
            status: DeviceStatus::Offline,
        })
        .await;
    diagram.unmount().await;

    match result? {
        AddOutcome::Placed { node_id } => {
            if !global.quiet {
                eprintln!("Device {} added ({node_id})", args.ip);
            }
        }
        // The CLI never arms placement mode.
        AddOutcome::Staged => {}
    }
    Ok(())
}

pub async fn delete(cfg: &Config, global: &GlobalOpts, args: DeleteArgs) -> Result<(), CliError> {
    if !util::confirm(
        &format!("Delete device '{}'? This removes it from the backend.", args.ip),
        "delete",
        global.yes,
    )? {
        return Ok(());
    }

    let diagram = util::build_diagram(global, cfg, Some(Duration::ZERO))?;
    diagram.mount().await;
    let result = diagram.delete_device(&args.ip).await;
    diagram.unmount().await;
    result?;

    if !global.quiet {
        eprintln!("Device {} deleted", args.ip);
    }
    Ok(())
}
