//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use netatlas_api::{MonitorClient, TransportConfig};
use netatlas_config::Config;
use netatlas_core::{CoreError, Diagram, DiagramConfig, SnapshotStore};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build a `MonitorClient` from the config with CLI flag overrides.
pub fn build_client(global: &GlobalOpts, cfg: &Config) -> Result<MonitorClient, CliError> {
    let url_str = global
        .backend
        .clone()
        .unwrap_or_else(|| cfg.backend.url.clone());
    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "backend".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let transport = TransportConfig {
        timeout: Duration::from_secs(global.timeout.unwrap_or(cfg.backend.timeout)),
    };

    MonitorClient::new(url, &transport).map_err(|e| CliError::from(CoreError::from(e)))
}

/// Build a `Diagram` over the configured snapshot store and area catalog.
///
/// `refresh_interval` overrides the config; `None` keeps the configured
/// value (one-shot commands pass zero to skip the periodic task).
pub fn build_diagram(
    global: &GlobalOpts,
    cfg: &Config,
    refresh_interval: Option<Duration>,
) -> Result<Diagram, CliError> {
    let client = build_client(global, cfg)?;
    let store = SnapshotStore::new(cfg.resolve_data_dir());

    Ok(Diagram::new(
        client,
        cfg.catalog(),
        store,
        DiagramConfig {
            refresh_interval: refresh_interval.unwrap_or_else(|| cfg.refresh_interval()),
            show_areas: cfg.show_areas,
        },
    ))
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Refuses to guess in non-interactive contexts: piping stdin without
/// `--yes` is an error, not a silent approval.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::ConfirmationRequired {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
