//! Monitoring log viewer (`GET /logs`).

use netatlas_config::Config;
use netatlas_core::CoreError;

use crate::cli::{GlobalOpts, LogsArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(cfg: &Config, global: &GlobalOpts, args: LogsArgs) -> Result<(), CliError> {
    let client = util::build_client(global, cfg)?;
    let mut lines = client
        .logs()
        .await
        .map_err(|e| CliError::from(CoreError::from(e)))?;

    if let Some(tail) = args.tail {
        let skip = lines.len().saturating_sub(tail);
        lines.drain(..skip);
    }

    let rendered = match global.output {
        // Log lines are already text; table adds nothing here.
        OutputFormat::Table | OutputFormat::Plain => lines.join("\n"),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&lines).map_err(|e| CliError::Internal(e.to_string()))?
        }
        OutputFormat::JsonCompact => {
            serde_json::to_string(&lines).map_err(|e| CliError::Internal(e.to_string()))?
        }
    };
    output::print_output(&rendered, global.quiet);
    Ok(())
}
