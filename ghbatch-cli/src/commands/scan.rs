//! `ghbatch scan`: export public local repositories into a projects list.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use ghbatch_exec::{GhCli, GitCli, ShellScriptRunner};
use ghbatch_reconcile::{scan, Context as RunContext, RunLog, ScanLogs, ThreadSleeper};

use crate::commands::load_config;
use crate::console::{print_tag_counts, ConsoleReporter};

/// Arguments for `ghbatch scan`.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory holding the logs and the exported projects file.
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Directory whose children are scanned (overrides SCAN_ROOT_PATH).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

impl ScanArgs {
    pub fn run(self) -> Result<()> {
        let config = load_config(self.workspace, self.root)?;

        let mut log = RunLog::open(&config.create_log_path()).context("failed to open run log")?;
        log.set_reporter(Box::new(ConsoleReporter));
        let mut logs = ScanLogs::open(&config).context("failed to open remote logs")?;

        let host = GhCli::new();
        let git = GitCli::new();
        let scripts = ShellScriptRunner::new();
        let ctx = RunContext {
            config: &config,
            host: &host,
            git: &git,
            scripts: &scripts,
            sleeper: &ThreadSleeper,
            dry_run: false,
        };

        let report = scan::run(&ctx, &mut log, &mut logs)
            .with_context(|| format!("scan of {} failed", config.scan_root.display()))?;

        println!();
        println!(
            "{} scanned, {} exported, {} ambiguous, {} skipped",
            report.scanned,
            report.exported.len(),
            report.ambiguous.len(),
            report.skipped
        );
        for dir in &report.ambiguous {
            println!("{} {}", "ambiguous:".yellow(), dir.display());
        }
        print_tag_counts(&log.counts());
        println!("Exported: {}", config.exported_projects_file.display());
        Ok(())
    }
}
