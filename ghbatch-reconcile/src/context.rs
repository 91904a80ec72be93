use ghbatch_core::Config;
use ghbatch_exec::{LocalGit, RemoteHost, ScriptRunner};

use crate::account::Sleeper;

/// Everything a reconciliation step needs besides the log: the immutable
/// configuration and the collaborator seams.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub config: &'a Config,
    pub host: &'a dyn RemoteHost,
    pub git: &'a dyn LocalGit,
    pub scripts: &'a dyn ScriptRunner,
    pub sleeper: &'a dyn Sleeper,
    /// Classify and plan only; no create, edit, git write or script run.
    pub dry_run: bool,
}
