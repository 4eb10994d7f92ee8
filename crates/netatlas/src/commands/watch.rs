//! Follow mode: keep the diagram mounted and report each refresh.

use std::time::Duration;

use netatlas_config::Config;
use netatlas_core::{DiagramState, NodeBody};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;

use super::util;

fn summary(state: &DiagramState) -> String {
    let mut online = 0usize;
    let mut offline = 0usize;
    for node in &state.nodes {
        if let NodeBody::Device { status, .. } = &node.body {
            if status.is_online() {
                online += 1;
            } else {
                offline += 1;
            }
        }
    }
    format!(
        "{} {online} online, {offline} offline, {} nodes, {} edges",
        chrono::Local::now().format("%H:%M:%S"),
        state.nodes.len(),
        state.edges.len(),
    )
}

pub async fn handle(cfg: &Config, global: &GlobalOpts, args: WatchArgs) -> Result<(), CliError> {
    let interval = args
        .interval
        .map_or_else(|| cfg.refresh_interval(), Duration::from_secs);
    let diagram = util::build_diagram(global, cfg, Some(interval))?;

    diagram.mount().await;
    if !global.quiet {
        eprintln!("Watching (refresh every {}s, Ctrl-C to stop)", interval.as_secs());
        println!("{}", summary(&diagram.state().await));
    }

    let mut rev = diagram.subscribe();
    rev.mark_unchanged();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rev.changed() => {
                if changed.is_err() {
                    break;
                }
                if !global.quiet {
                    println!("{}", summary(&diagram.state().await));
                }
            }
        }
    }

    diagram.unmount().await;
    Ok(())
}
