//! Description-marker state machine.
//!
//! ```text
//! Unmarked        -> NeedsAttention   (description edited; triggers sync)
//! NeedsAttention  -> (no-op, SKIP)
//! Done            -> (no-op, SKIP)
//! ```
//!
//! Applied once per project per run, only against the primary account's copy
//! of the repository. Because both marked states are sticky, repeated runs
//! converge.

use ghbatch_core::{Account, Description, Marker, RepoSlug};

use crate::context::Context;
use crate::error::ReconcileError;
use crate::run_log::{RunLog, Tag};

/// Result of applying the marker step to one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerOutcome {
    /// The primary account has no such repository.
    NotFound,
    /// Already `NeedsAttention` or `Done`; nothing written.
    AlreadyMarked(Marker),
    /// `Unmarked -> NeedsAttention` was written; carries the new description.
    Claimed(Description),
    /// Dry run: the transition would have been written.
    WouldClaim(Description),
}

/// Run the state machine for `primary/project`.
pub fn apply(
    ctx: &Context<'_>,
    log: &mut RunLog,
    primary: &Account,
    project: &str,
) -> Result<MarkerOutcome, ReconcileError> {
    let slug = RepoSlug::new(primary.0.clone(), project);
    let Some(state) = ctx.host.repo_view(&slug)? else {
        log.record(Tag::Skip, format!("{slug} not found; marker unchanged"));
        return Ok(MarkerOutcome::NotFound);
    };

    let current = state.description.unwrap_or_default();
    let Some(next) = current.claim_attention() else {
        log.record(
            Tag::Skip,
            format!("{slug} already marked ({})", current.marker),
        );
        return Ok(MarkerOutcome::AlreadyMarked(current.marker));
    };

    if ctx.dry_run {
        log.record(
            Tag::Info,
            format!("[dry-run] would mark {slug}: \"{}\"", next.to_wire()),
        );
        return Ok(MarkerOutcome::WouldClaim(next));
    }

    ctx.host.repo_edit_description(&slug, &next)?;
    log.record(
        Tag::Update,
        format!("{slug} marked {}: \"{}\"", next.marker, next.to_wire()),
    );
    Ok(MarkerOutcome::Claimed(next))
}
