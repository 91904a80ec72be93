//! `ghbatch reconcile`: the primary flow.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use ghbatch_exec::{GhCli, GitCli, ShellScriptRunner};
use ghbatch_reconcile::{
    load_inputs, pipeline, Context as RunContext, RunLog, RunSummary, ThreadSleeper,
};

use crate::commands::load_config;
use crate::console::{print_tag_counts, ConsoleReporter};

/// Arguments for `ghbatch reconcile`.
#[derive(Args, Debug, Default)]
pub struct ReconcileArgs {
    /// Classify and plan only; create, edit and commit nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// Directory holding the list files, logs and project directories.
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,
}

impl ReconcileArgs {
    pub fn run(self) -> Result<()> {
        let config = load_config(self.workspace, None)?;
        let inputs = load_inputs(&config).context("cannot start without both list files")?;

        let log_path = config.create_log_path();
        let mut log = RunLog::open(&log_path)
            .with_context(|| format!("failed to open run log {}", log_path.display()))?;
        log.set_reporter(Box::new(ConsoleReporter));

        let host = GhCli::new();
        let git = GitCli::new();
        let scripts = ShellScriptRunner::new();
        let ctx = RunContext {
            config: &config,
            host: &host,
            git: &git,
            scripts: &scripts,
            sleeper: &ThreadSleeper,
            dry_run: self.dry_run,
        };

        let summary = pipeline::run(&ctx, &mut log, &inputs);

        print_summary(&summary, self.dry_run);
        print_tag_counts(&log.counts());
        println!("Log: {}", log_path.display());
        Ok(())
    }
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    println!();
    println!(
        "{prefix}{} account(s) × {} project(s): {} created, {} existing, {} private/fork, {} marked, {} committed",
        summary.accounts,
        summary.projects,
        summary.created,
        summary.existing,
        summary.protected,
        summary.marked,
        summary.committed,
    );
    if summary.rejected > 0 {
        println!(
            "{}",
            format!("{} project line(s) could not be parsed and were skipped", summary.rejected)
                .yellow()
        );
    }
    if !summary.skipped_accounts.is_empty() {
        let names: Vec<String> = summary.skipped_accounts.iter().map(|a| a.to_string()).collect();
        println!("{}", format!("accounts skipped: {}", names.join(", ")).yellow());
    }
    if summary.failed > 0 {
        println!("{}", format!("{} failure(s); see the log", summary.failed).red());
    }
}
