//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod devices;
pub mod layout_cmd;
pub mod logs;
pub mod status;
pub mod util;
pub mod watch;

use netatlas_config::Config;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(cfg, global).await,
        Command::Logs(args) => logs::handle(cfg, global, args).await,
        Command::Add(args) => devices::add(cfg, global, args).await,
        Command::Delete(args) => devices::delete(cfg, global, args).await,
        Command::Layout(args) => layout_cmd::handle(cfg, global, args).await,
        Command::Watch(args) => watch::handle(cfg, global, args).await,
        // Completions are handled before dispatch
        Command::Completions(_) => unreachable!(),
    }
}
