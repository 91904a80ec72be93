//! Creation planner.
//!
//! Only runs for repositories classified `NotFound`.
//!
//! ```text
//! no local directory                    -> RemoteOnly
//! directory without .git                -> InitThenLink (init main, add, commit)
//! .git, no `origin` remote              -> LinkExisting
//! .git with `origin` already configured -> RemoteOnly (existing linkage untouched)
//! ```
//!
//! Source-linked creation creates the remote with the directory as its source,
//! names the new remote `origin` and pushes the current branch.

use std::fmt;

use ghbatch_core::{LocalRepoLink, ProjectSpec, RepoSlug};
use ghbatch_exec::{CreateRequest, SourceLink};

use crate::context::Context;
use crate::error::ReconcileError;
use crate::run_log::{RunLog, Tag};

pub const PRIMARY_BRANCH: &str = "main";
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";
pub const ORIGIN: &str = "origin";

/// Creation strategy for a missing repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationPlan {
    RemoteOnly,
    InitThenLink,
    LinkExisting,
}

impl fmt::Display for CreationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreationPlan::RemoteOnly => write!(f, "remote only"),
            CreationPlan::InitThenLink => write!(f, "init + linked push"),
            CreationPlan::LinkExisting => write!(f, "linked push"),
        }
    }
}

/// Pick a plan from the local directory state.
pub fn plan(local: Option<&LocalRepoLink>) -> CreationPlan {
    match local {
        None => CreationPlan::RemoteOnly,
        Some(link) if !link.has_git_metadata => CreationPlan::InitThenLink,
        Some(link) if link.has_origin() => CreationPlan::RemoteOnly,
        Some(_) => CreationPlan::LinkExisting,
    }
}

/// Plan and carry out the creation of `slug`.
///
/// A failing create (or local preparation step) is returned as an error for
/// the caller to log at the project boundary.
pub fn execute(
    ctx: &Context<'_>,
    log: &mut RunLog,
    slug: &RepoSlug,
    project: &ProjectSpec,
    local: Option<&LocalRepoLink>,
) -> Result<CreationPlan, ReconcileError> {
    let chosen = plan(local);

    if ctx.dry_run {
        log.record(Tag::Info, format!("[dry-run] would create {slug} ({chosen})"));
        return Ok(chosen);
    }

    let source = match (chosen, local) {
        (CreationPlan::RemoteOnly, _) | (_, None) => None,
        (CreationPlan::InitThenLink, Some(link)) => {
            ctx.git.init(&link.directory, PRIMARY_BRANCH)?;
            ctx.git.add_all(&link.directory)?;
            ctx.git.commit(&link.directory, INITIAL_COMMIT_MESSAGE)?;
            Some(source_link(link))
        }
        (CreationPlan::LinkExisting, Some(link)) => Some(source_link(link)),
    };

    let request = CreateRequest {
        slug: slug.clone(),
        args: project.create_args(),
        source,
    };
    ctx.host.repo_create(&request)?;

    log.record(Tag::Success, format!("created {slug} ({chosen})"));
    Ok(chosen)
}

fn source_link(link: &LocalRepoLink) -> SourceLink {
    SourceLink {
        directory: link.directory.clone(),
        remote_name: ORIGIN.to_string(),
        push: true,
    }
}
