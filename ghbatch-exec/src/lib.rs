//! # ghbatch-exec
//!
//! Collaborator seams for the reconciliation engine and their process-backed
//! implementations:
//!
//! - [`RemoteHost`]: account switching and repository view/create/edit ([`GhCli`])
//! - [`LocalGit`]: working-tree operations and remote listing ([`GitCli`])
//! - [`ScriptRunner`]: opaque per-project sync scripts ([`ShellScriptRunner`])
//!
//! The engine only sees the traits; tests substitute recording fakes.

pub mod error;
pub mod gh;
pub mod git;
pub mod inspect;
mod process;
pub mod script;
pub mod url;

use std::path::{Path, PathBuf};

use ghbatch_core::{Account, Description, RemoteEntry, RemoteRepositoryState, RepoSlug};

pub use error::CommandError;
pub use gh::GhCli;
pub use git::GitCli;
pub use inspect::inspect_local;
pub use script::ShellScriptRunner;
pub use url::parse_remote_url;

/// Link a newly created remote to an existing local directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLink {
    pub directory: PathBuf,
    pub remote_name: String,
    pub push: bool,
}

/// Arguments of a remote create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub slug: RepoSlug,
    /// Extra flags from the project spec (visibility, description, …).
    pub args: Vec<String>,
    pub source: Option<SourceLink>,
}

/// The remote hosting surface.
pub trait RemoteHost {
    /// Make `account` the active credential context. Propagation may lag.
    fn switch_account(&self, account: &Account) -> Result<(), CommandError>;

    /// The account the host currently acts as, if any.
    fn active_account(&self) -> Result<Option<Account>, CommandError>;

    /// Fresh snapshot of `slug`; `Ok(None)` when the repository does not exist.
    fn repo_view(&self, slug: &RepoSlug) -> Result<Option<RemoteRepositoryState>, CommandError>;

    fn repo_create(&self, request: &CreateRequest) -> Result<(), CommandError>;

    fn repo_edit_description(
        &self,
        slug: &RepoSlug,
        description: &Description,
    ) -> Result<(), CommandError>;
}

/// Working-tree operations on a local directory.
pub trait LocalGit {
    /// Ordered `(name, url, direction)` rows; empty when nothing is configured.
    fn remote_list(&self, dir: &Path) -> Result<Vec<RemoteEntry>, CommandError>;

    fn init(&self, dir: &Path, branch: &str) -> Result<(), CommandError>;

    fn add_all(&self, dir: &Path) -> Result<(), CommandError>;

    fn commit(&self, dir: &Path, message: &str) -> Result<(), CommandError>;

    /// `true` when the working tree has staged, unstaged or untracked changes.
    fn has_changes(&self, dir: &Path) -> Result<bool, CommandError>;

    fn pull_rebase(&self, dir: &Path) -> Result<(), CommandError>;
}

/// Runs an arbitrary side-effecting script.
pub trait ScriptRunner {
    fn run_script(&self, script: &Path, cwd: &Path) -> Result<(), CommandError>;
}
