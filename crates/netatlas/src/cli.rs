//! Clap derive structures for the `netatlas` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netatlas -- network diagram dashboard for the LAN monitor backend
#[derive(Debug, Parser)]
#[command(
    name = "netatlas",
    version,
    about = "Inspect and lay out the network diagram from the command line",
    long_about = "A CLI for the LAN monitor backend: device status, monitoring logs,\n\
        device registration, and the persisted diagram layout.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend base URL (overrides config)
    #[arg(long, short = 'b', env = "NETATLAS_URL", global = true)]
    pub backend: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NETATLAS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "NETATLAS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the status of every registered device
    #[command(alias = "st")]
    Status,

    /// Show the backend's monitoring log
    Logs(LogsArgs),

    /// Register a device and place it on the diagram
    Add(AddArgs),

    /// Remove a device from the backend and the diagram
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Inspect or reset the persisted diagram layout
    Layout(LayoutArgs),

    /// Follow the diagram, refreshing on the configured interval
    Watch(WatchArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LogsArgs {
    /// Only show the last N log lines
    #[arg(long, short = 'n')]
    pub tail: Option<usize>,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Device IP address
    pub ip: String,

    /// Area name the device belongs to
    #[arg(long, short = 'l')]
    pub location: String,

    /// Human-readable device name
    #[arg(long, short = 'n')]
    pub name: String,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Device IP address
    pub ip: String,
}

#[derive(Debug, Args)]
pub struct LayoutArgs {
    #[command(subcommand)]
    pub command: LayoutCommand,
}

#[derive(Debug, Subcommand)]
pub enum LayoutCommand {
    /// Print the current node and edge layout
    Show,
    /// Discard every saved edit and rebuild from the catalog and backend
    Reset,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between refreshes (overrides config)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
