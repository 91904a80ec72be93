//! ghbatch: batch GitHub repository creation and reconciliation.
//!
//! # Usage
//!
//! ```text
//! ghbatch [reconcile] [--dry-run] [--workspace <dir>] [--verbose]
//! ghbatch scan [--workspace <dir>] [--root <dir>]
//! ghbatch lists [--workspace <dir>] [--json]
//! ```
//!
//! With no subcommand `reconcile` runs with its defaults.

mod commands;
mod console;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{lists::ListsArgs, reconcile::ReconcileArgs, scan::ScanArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "ghbatch",
    version,
    about = "Create and reconcile GitHub repositories across several accounts",
    long_about = None,
    args_conflicts_with_subcommands = true,
)]
struct Cli {
    /// Debug-level diagnostics on stderr (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    /// `reconcile` flags accepted without naming the subcommand.
    #[command(flatten)]
    reconcile: ReconcileArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create missing repositories, then mark and sync the primary account's.
    Reconcile(ReconcileArgs),

    /// Export public local repositories back into a projects list.
    Scan(ScanArgs),

    /// Parse the list files and show what a run would work on.
    Lists(ListsArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command.unwrap_or(Commands::Reconcile(cli.reconcile)) {
        Commands::Reconcile(args) => args.run(),
        Commands::Scan(args) => args.run(),
        Commands::Lists(args) => args.run(),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
