//! Repository state classifier.
//!
//! Disposition precedence:
//! 1. `NotFound` (no repository at `owner/name`)
//! 2. `ExistsPrivate` (private wins over fork when both are set)
//! 3. `ExistsFork`
//! 4. `ExistsPublicNonFork`

use std::fmt;
use std::path::Path;

use ghbatch_core::{LocalRepoLink, RemoteRepositoryState, RepoSlug};
use ghbatch_exec::inspect_local;

use crate::context::Context;
use crate::error::ReconcileError;
use crate::run_log::{RunLog, Tag};

/// What the reconciler should do with a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    NotFound,
    ExistsPrivate,
    ExistsFork,
    ExistsPublicNonFork,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disposition::NotFound => write!(f, "not found"),
            Disposition::ExistsPrivate => write!(f, "private"),
            Disposition::ExistsFork => write!(f, "fork"),
            Disposition::ExistsPublicNonFork => write!(f, "already exists"),
        }
    }
}

/// Pure disposition of a remote snapshot.
pub fn disposition_of(state: Option<&RemoteRepositoryState>) -> Disposition {
    match state {
        None => Disposition::NotFound,
        Some(s) if s.is_private => Disposition::ExistsPrivate,
        Some(s) if s.is_fork => Disposition::ExistsFork,
        Some(_) => Disposition::ExistsPublicNonFork,
    }
}

/// A classified repository together with the data the decision was made on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub slug: RepoSlug,
    pub disposition: Disposition,
    pub state: Option<RemoteRepositoryState>,
    /// Local working directory, when one exists. Diagnostic only.
    pub local: Option<LocalRepoLink>,
}

/// Query the remote for `slug` and, when `local_dir` is given, inspect it.
///
/// A failure inspecting the local directory is traced and ignored; it never
/// affects the disposition.
pub fn classify(
    ctx: &Context<'_>,
    slug: &RepoSlug,
    local_dir: Option<&Path>,
) -> Result<Classification, ReconcileError> {
    let state = ctx.host.repo_view(slug)?;
    let local = match local_dir {
        Some(dir) => inspect_local(ctx.git, dir).unwrap_or_else(|err| {
            tracing::debug!(dir = %dir.display(), error = %err, "local inspection failed");
            None
        }),
        None => None,
    };
    Ok(Classification {
        slug: slug.clone(),
        disposition: disposition_of(state.as_ref()),
        state,
        local,
    })
}

/// Log the skip outcome of an existing repository. `NotFound` logs nothing;
/// the planner records what it does instead.
pub fn report(log: &mut RunLog, classification: &Classification) {
    let slug = &classification.slug;
    let local = classification
        .local
        .as_ref()
        .filter(|l| l.has_git_metadata)
        .map(|l| format!(" [local remotes: {}]", l.summary()))
        .unwrap_or_default();

    match classification.disposition {
        Disposition::NotFound => {}
        Disposition::ExistsPrivate => {
            log.record(Tag::Warn, format!("SKIP PRIVATE {slug} (private){local}"));
        }
        Disposition::ExistsFork => {
            log.record(Tag::Warn, format!("SKIP FORK {slug} (fork){local}"));
        }
        Disposition::ExistsPublicNonFork => {
            log.record(Tag::Exist, format!("{slug} already exists{local}"));
        }
    }
}
