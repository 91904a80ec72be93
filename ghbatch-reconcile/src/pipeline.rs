//! Top-level reconciliation pipeline.
//!
//! Execution order (fixed):
//! 1. Load both list files; either missing is fatal before anything runs.
//! 2. Creation pass, account-major: for each account switch and wait until it
//!    is active, then classify every project and create what is missing.
//! 3. Marker pass: switch to the primary account and, per project, run the
//!    marker state machine. A fresh `Unmarked -> NeedsAttention` transition
//!    triggers sync-and-commit in the project's working directory.
//!
//! A failure inside one (account, project) pair is logged as ERROR and the
//! batch continues. An account that never becomes active is skipped whole.

use ghbatch_core::lists::{load_accounts, load_projects};
use ghbatch_core::{Account, Config, ProjectList, ProjectSpec, RepoSlug};

use crate::account::activate;
use crate::classify::{classify, report, Disposition};
use crate::context::Context;
use crate::error::ReconcileError;
use crate::marker_pass::{self, MarkerOutcome};
use crate::orchestrator::{sync_and_commit, SyncOutcome};
use crate::planner;
use crate::run_log::{RunLog, Tag};

/// Parsed list files for one run.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub accounts: Vec<Account>,
    pub projects: ProjectList,
}

/// Load the accounts and projects lists named by `config`.
pub fn load_inputs(config: &Config) -> Result<Inputs, ReconcileError> {
    let accounts = load_accounts(&config.accounts_file)?;
    let projects = load_projects(&config.projects_file)?;
    tracing::debug!(
        accounts = accounts.len(),
        projects = projects.projects.len(),
        rejected = projects.rejected.len(),
        "lists loaded"
    );
    Ok(Inputs { accounts, projects })
}

/// Tallies for the end-of-run summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub accounts: usize,
    pub projects: usize,
    /// Project lines the grammar rejected.
    pub rejected: usize,
    /// Accounts that never became active.
    pub skipped_accounts: Vec<Account>,
    /// Repositories created (or, in a dry run, that would be).
    pub created: usize,
    pub existing: usize,
    /// Private or fork repositories left alone.
    pub protected: usize,
    pub failed: usize,
    /// Descriptions moved to `NeedsAttention`.
    pub marked: usize,
    pub committed: usize,
}

/// Run both passes over `inputs`.
pub fn run(ctx: &Context<'_>, log: &mut RunLog, inputs: &Inputs) -> RunSummary {
    let projects = &inputs.projects.projects;
    let mut summary = RunSummary {
        accounts: inputs.accounts.len(),
        projects: projects.len(),
        rejected: inputs.projects.rejected.len(),
        ..RunSummary::default()
    };

    log.record(
        Tag::Info,
        format!(
            "run started: {} account(s), {} project(s){}",
            summary.accounts,
            summary.projects,
            if ctx.dry_run { " [dry-run]" } else { "" }
        ),
    );

    creation_pass(ctx, log, &inputs.accounts, projects, &mut summary);
    marking_pass(ctx, log, &inputs.accounts, projects, &mut summary);

    log.record(
        Tag::Info,
        format!(
            "run finished: {} created, {} existing, {} protected, {} failed, {} marked",
            summary.created, summary.existing, summary.protected, summary.failed, summary.marked
        ),
    );
    summary
}

// ---------------------------------------------------------------------------
// Creation pass
// ---------------------------------------------------------------------------

fn creation_pass(
    ctx: &Context<'_>,
    log: &mut RunLog,
    accounts: &[Account],
    projects: &[ProjectSpec],
    summary: &mut RunSummary,
) {
    if accounts.is_empty() {
        log.record(Tag::Warn, "accounts list is empty; nothing to create");
        return;
    }

    for account in accounts {
        if let Err(err) = activate(ctx.host, ctx.sleeper, account, &ctx.config.switch_backoff) {
            log.record(Tag::Error, format!("skipping account {account}: {err}"));
            summary.skipped_accounts.push(account.clone());
            continue;
        }
        log.record(Tag::Info, format!("switched to {account}"));

        for project in projects {
            let slug = RepoSlug::new(account.0.clone(), project.name.clone());
            match reconcile_one(ctx, log, &slug, project) {
                Ok(Disposition::NotFound) => summary.created += 1,
                Ok(Disposition::ExistsPublicNonFork) => summary.existing += 1,
                Ok(Disposition::ExistsPrivate | Disposition::ExistsFork) => summary.protected += 1,
                Err(err) => {
                    log.record(Tag::Error, format!("{slug}: {err}"));
                    summary.failed += 1;
                }
            }
        }
    }
}

fn reconcile_one(
    ctx: &Context<'_>,
    log: &mut RunLog,
    slug: &RepoSlug,
    project: &ProjectSpec,
) -> Result<Disposition, ReconcileError> {
    let dir = ctx.config.project_dir(&project.name);
    let classification = classify(ctx, slug, Some(&dir))?;
    report(log, &classification);

    if classification.disposition == Disposition::NotFound {
        planner::execute(ctx, log, slug, project, classification.local.as_ref())?;
    }
    Ok(classification.disposition)
}

// ---------------------------------------------------------------------------
// Marker pass
// ---------------------------------------------------------------------------

fn marking_pass(
    ctx: &Context<'_>,
    log: &mut RunLog,
    accounts: &[Account],
    projects: &[ProjectSpec],
    summary: &mut RunSummary,
) {
    let Some(primary) = ctx.config.primary_account(accounts) else {
        log.record(Tag::Warn, "no primary account; marker pass skipped");
        return;
    };
    if ctx.config.active_account.is_none() {
        log.record(
            Tag::Warn,
            format!("ACTIVE_ACCOUNT not set; using first listed account {primary}"),
        );
    }
    if let Err(err) = activate(ctx.host, ctx.sleeper, &primary, &ctx.config.switch_backoff) {
        log.record(Tag::Error, format!("marker pass skipped: {err}"));
        return;
    }

    for project in projects {
        match marker_pass::apply(ctx, log, &primary, &project.name) {
            Ok(MarkerOutcome::Claimed(_)) => {
                summary.marked += 1;
                let dir = ctx.config.project_dir(&project.name);
                if let SyncOutcome::Committed { .. } =
                    sync_and_commit(ctx, log, &project.name, &dir)
                {
                    summary.committed += 1;
                }
            }
            Ok(MarkerOutcome::WouldClaim(_)) => summary.marked += 1,
            Ok(MarkerOutcome::NotFound | MarkerOutcome::AlreadyMarked(_)) => {}
            Err(err) => {
                log.record(Tag::Error, format!("{primary}/{}: {err}", project.name));
                summary.failed += 1;
            }
        }
    }
}
