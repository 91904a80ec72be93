//! Sync-and-commit for a project that was just marked for attention.
//!
//! Steps, each logged and none fatal to the batch:
//! 1. run the project's sync script (a failure is logged; the tree is still checked)
//! 2. require `.git` in the project directory itself, so git never resolves
//!    to an enclosing repository
//! 3. if the working tree changed: stage everything and commit; stop on commit failure
//! 4. after a commit: `pull --rebase`; failure is a WARN (possible conflict)

use std::path::Path;

use crate::context::Context;
use crate::run_log::{RunLog, Tag};

pub const SYNC_COMMIT_MESSAGE: &str = "sync: automated update";

/// How far orchestration got for one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No sync script in the project directory; nothing ran.
    NoScript,
    /// The project directory has no `.git` of its own; git was not touched.
    NotAWorkingTree,
    /// Working tree clean after the script (or status could not be read).
    NoChanges,
    CommitFailed,
    Committed { pulled: bool },
}

/// Run the sync procedure for the project directory `dir`.
pub fn sync_and_commit(ctx: &Context<'_>, log: &mut RunLog, project: &str, dir: &Path) -> SyncOutcome {
    let script = dir.join(&ctx.config.sync_script);
    if !script.is_file() {
        tracing::debug!(project, script = %script.display(), "no sync script");
        return SyncOutcome::NoScript;
    }

    match ctx.scripts.run_script(&script, dir) {
        Ok(()) => log.record(Tag::Sync, format!("{project}: ran {}", script.display())),
        Err(err) => log.record(Tag::Warn, format!("{project}: sync script failed: {err}")),
    }

    if !dir.join(".git").exists() {
        log.record(
            Tag::Warn,
            format!("{project}: {} is not a git working tree; commit skipped", dir.display()),
        );
        return SyncOutcome::NotAWorkingTree;
    }

    match ctx.git.has_changes(dir) {
        Ok(true) => {}
        Ok(false) => {
            log.record(Tag::Info, format!("{project}: no changes"));
            return SyncOutcome::NoChanges;
        }
        Err(err) => {
            log.record(Tag::Warn, format!("{project}: status check failed: {err}"));
            return SyncOutcome::NoChanges;
        }
    }

    let committed = ctx
        .git
        .add_all(dir)
        .and_then(|()| ctx.git.commit(dir, SYNC_COMMIT_MESSAGE));
    if let Err(err) = committed {
        log.record(Tag::Warn, format!("{project}: commit failed: {err}"));
        return SyncOutcome::CommitFailed;
    }
    log.record(Tag::Commit, format!("{project}: committed \"{SYNC_COMMIT_MESSAGE}\""));

    match ctx.git.pull_rebase(dir) {
        Ok(()) => {
            log.record(Tag::Sync, format!("{project}: pulled with rebase"));
            SyncOutcome::Committed { pulled: true }
        }
        Err(err) => {
            log.record(
                Tag::Warn,
                format!("{project}: pull --rebase failed (possible conflict): {err}"),
            );
            SyncOutcome::Committed { pulled: false }
        }
    }
}
