//! Diagram layout inspection and reset.

use std::fmt::Write as _;
use std::time::Duration;

use tabled::Tabled;

use netatlas_config::Config;
use netatlas_core::{DiagramNode, DiagramState, NodeBody};

use crate::cli::{GlobalOpts, LayoutArgs, LayoutCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "KIND")]
    kind: String,
    #[tabled(rename = "X")]
    x: String,
    #[tabled(rename = "Y")]
    y: String,
    #[tabled(rename = "DETAIL")]
    detail: String,
}

fn node_row(node: &DiagramNode) -> NodeRow {
    let (kind, detail) = match &node.body {
        NodeBody::Area {
            name,
            width,
            height,
            ..
        } => ("area".to_owned(), format!("{name} ({width}x{height})")),
        NodeBody::Device {
            label, ip, status, ..
        } => ("device".to_owned(), format!("{label} {ip} [{status}]")),
    };
    NodeRow {
        id: node.id.clone(),
        kind,
        x: format!("{:.0}", node.position.x),
        y: format!("{:.0}", node.position.y),
        detail,
    }
}

fn detail_view(state: &DiagramState) -> String {
    let rows: Vec<NodeRow> = state.nodes.iter().map(node_row).collect();
    let mut out = output::render_table(&rows);

    if !state.edges.is_empty() {
        let _ = write!(out, "\n\nEdges:");
        for edge in &state.edges {
            let _ = write!(out, "\n  {} -- {}", edge.source, edge.target);
        }
    }
    out
}

pub async fn handle(cfg: &Config, global: &GlobalOpts, args: LayoutArgs) -> Result<(), CliError> {
    match args.command {
        LayoutCommand::Show => {
            let diagram = util::build_diagram(global, cfg, Some(Duration::ZERO))?;
            diagram.mount().await;
            let state = diagram.state().await;
            diagram.unmount().await;

            let rendered = output::render_single(&global.output, &state, detail_view, |s| {
                s.nodes
                    .iter()
                    .map(|n| n.id.clone())
                    .collect::<Vec<_>>()
                    .join("\n")
            });
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        LayoutCommand::Reset => {
            if !util::confirm(
                "Reset the diagram layout? All manual placements and edges will be lost.",
                "layout reset",
                global.yes,
            )? {
                return Ok(());
            }

            let diagram = util::build_diagram(global, cfg, Some(Duration::ZERO))?;
            diagram.mount().await;
            diagram.reset_layout().await;
            diagram.unmount().await;

            if !global.quiet {
                eprintln!("Layout reset");
            }
            Ok(())
        }
    }
}
