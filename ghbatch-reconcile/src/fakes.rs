//! Recording fakes for the collaborator seams, plus a [`Harness`] that wires
//! them to a temporary workspace.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

use ghbatch_core::{
    Account, BackoffSettings, Config, ConfigOverrides, Description, Direction, EnvSnapshot,
    RemoteEntry, RemoteRepositoryState, RepoSlug,
};
use ghbatch_exec::{CommandError, CreateRequest, LocalGit, RemoteHost, ScriptRunner};

use crate::account::Sleeper;
use crate::context::Context;

fn failed(program: &str, args: String, stderr: &str) -> CommandError {
    CommandError::Failed {
        program: program.to_string(),
        args,
        code: Some(1),
        stderr: stderr.to_string(),
    }
}

fn slug_from(full_name: &str) -> RepoSlug {
    match full_name.split_once('/') {
        Some((owner, name)) => RepoSlug::new(owner, name),
        None => RepoSlug::new("", full_name),
    }
}

// ---------------------------------------------------------------------------
// Remote host
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeHost {
    repos: RefCell<BTreeMap<String, RemoteRepositoryState>>,
    active: RefCell<Option<Account>>,
    previous: RefCell<Option<Account>>,
    switch_lag: u32,
    pending_lag: Cell<u32>,
    failing_switches: RefCell<BTreeSet<String>>,
    failing_views: RefCell<BTreeSet<String>>,
    failing_creates: RefCell<BTreeSet<String>>,
    creates: RefCell<Vec<CreateRequest>>,
    edits: RefCell<Vec<(String, String)>>,
    calls: RefCell<Vec<String>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// After a switch, keep reporting the previous account for `polls` queries.
    pub fn with_switch_lag(mut self, polls: u32) -> Self {
        self.switch_lag = polls;
        self
    }

    /// Add or replace the repository `full_name` (`owner/name`).
    pub fn insert(
        &self,
        full_name: &str,
        description: Option<Description>,
        is_private: bool,
        is_fork: bool,
    ) {
        self.repos.borrow_mut().insert(
            full_name.to_string(),
            RemoteRepositoryState {
                full_name: slug_from(full_name),
                description,
                is_private,
                is_fork,
            },
        );
    }

    pub fn fail_switch(&self, account: &str) {
        self.failing_switches.borrow_mut().insert(account.to_string());
    }

    pub fn fail_view(&self, full_name: &str) {
        self.failing_views.borrow_mut().insert(full_name.to_string());
    }

    pub fn fail_create(&self, full_name: &str) {
        self.failing_creates.borrow_mut().insert(full_name.to_string());
    }

    pub fn state(&self, full_name: &str) -> Option<RemoteRepositoryState> {
        self.repos.borrow().get(full_name).cloned()
    }

    pub fn creates(&self) -> Vec<CreateRequest> {
        self.creates.borrow().clone()
    }

    /// `(owner/name, wire description)` for every edit, in order.
    pub fn edits(&self) -> Vec<(String, String)> {
        self.edits.borrow().clone()
    }

    /// Every call as `"<verb> <target>"`, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn note(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl RemoteHost for FakeHost {
    fn switch_account(&self, account: &Account) -> Result<(), CommandError> {
        self.note(format!("switch {account}"));
        if self.failing_switches.borrow().contains(&account.0) {
            return Err(failed(
                "gh",
                format!("auth switch --user {account}"),
                "no such account",
            ));
        }
        let previous = self.active.replace(Some(account.clone()));
        self.previous.replace(previous);
        self.pending_lag.set(self.switch_lag);
        Ok(())
    }

    fn active_account(&self) -> Result<Option<Account>, CommandError> {
        let lag = self.pending_lag.get();
        if lag > 0 {
            self.pending_lag.set(lag - 1);
            return Ok(self.previous.borrow().clone());
        }
        Ok(self.active.borrow().clone())
    }

    fn repo_view(&self, slug: &RepoSlug) -> Result<Option<RemoteRepositoryState>, CommandError> {
        let key = slug.to_string();
        self.note(format!("view {key}"));
        if self.failing_views.borrow().contains(&key) {
            return Err(failed("gh", format!("repo view {key}"), "HTTP 502"));
        }
        Ok(self.repos.borrow().get(&key).cloned())
    }

    fn repo_create(&self, request: &CreateRequest) -> Result<(), CommandError> {
        let key = request.slug.to_string();
        self.note(format!("create {key}"));
        if self.failing_creates.borrow().contains(&key) {
            return Err(failed(
                "gh",
                format!("repo create {key}"),
                "repository name already exists on this account",
            ));
        }
        let description = request
            .args
            .iter()
            .position(|a| a == "--description")
            .and_then(|i| request.args.get(i + 1))
            .map(|raw| Description::parse(raw));
        let is_private = request
            .args
            .iter()
            .any(|a| a == "--private" || a == "--internal");
        self.insert(&key, description, is_private, false);
        self.creates.borrow_mut().push(request.clone());
        Ok(())
    }

    fn repo_edit_description(
        &self,
        slug: &RepoSlug,
        description: &Description,
    ) -> Result<(), CommandError> {
        let key = slug.to_string();
        self.note(format!("edit {key}"));
        let mut repos = self.repos.borrow_mut();
        let Some(state) = repos.get_mut(&key) else {
            return Err(failed("gh", format!("repo edit {key}"), "HTTP 404"));
        };
        state.description = Some(description.clone());
        self.edits.borrow_mut().push((key, description.to_wire()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Local git
// ---------------------------------------------------------------------------

/// A mutating git call. Read-only queries are not recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Init(PathBuf, String),
    AddAll(PathBuf),
    Commit(PathBuf, String),
    PullRebase(PathBuf),
}

#[derive(Default)]
pub struct FakeGit {
    remotes: RefCell<HashMap<PathBuf, Vec<RemoteEntry>>>,
    changes: Cell<bool>,
    commit_fails: Cell<bool>,
    pull_fails: Cell<bool>,
    calls: RefCell<Vec<GitCall>>,
}

impl FakeGit {
    /// Configure `dir` with a fetch and a push entry for every `(name, url)`.
    pub fn set_remotes(&self, dir: &Path, remotes: &[(&str, &str)]) {
        let entries = remotes
            .iter()
            .flat_map(|(name, url)| {
                [Direction::Fetch, Direction::Push].map(|direction| RemoteEntry {
                    name: name.to_string(),
                    url: url.to_string(),
                    direction,
                })
            })
            .collect();
        self.remotes.borrow_mut().insert(dir.to_path_buf(), entries);
    }

    pub fn set_changes(&self, dirty: bool) {
        self.changes.set(dirty);
    }

    pub fn fail_commit(&self) {
        self.commit_fails.set(true);
    }

    pub fn fail_pull(&self) {
        self.pull_fails.set(true);
    }

    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.borrow().clone()
    }

    fn note(&self, call: GitCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl LocalGit for FakeGit {
    fn remote_list(&self, dir: &Path) -> Result<Vec<RemoteEntry>, CommandError> {
        Ok(self.remotes.borrow().get(dir).cloned().unwrap_or_default())
    }

    fn init(&self, dir: &Path, branch: &str) -> Result<(), CommandError> {
        self.note(GitCall::Init(dir.to_path_buf(), branch.to_string()));
        std::fs::create_dir_all(dir.join(".git")).map_err(|source| CommandError::Spawn {
            program: "git".to_string(),
            source,
        })
    }

    fn add_all(&self, dir: &Path) -> Result<(), CommandError> {
        self.note(GitCall::AddAll(dir.to_path_buf()));
        Ok(())
    }

    fn commit(&self, dir: &Path, message: &str) -> Result<(), CommandError> {
        self.note(GitCall::Commit(dir.to_path_buf(), message.to_string()));
        if self.commit_fails.get() {
            return Err(failed("git", "commit".to_string(), "nothing to commit"));
        }
        self.changes.set(false);
        Ok(())
    }

    fn has_changes(&self, _dir: &Path) -> Result<bool, CommandError> {
        Ok(self.changes.get())
    }

    fn pull_rebase(&self, dir: &Path) -> Result<(), CommandError> {
        self.note(GitCall::PullRebase(dir.to_path_buf()));
        if self.pull_fails.get() {
            return Err(failed(
                "git",
                "pull --rebase".to_string(),
                "CONFLICT (content): Merge conflict in README.md",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scripts and sleeping
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeScripts {
    ran: RefCell<Vec<PathBuf>>,
    fails: Cell<bool>,
}

impl FakeScripts {
    pub fn ran(&self) -> Vec<PathBuf> {
        self.ran.borrow().clone()
    }

    pub fn fail(&self) {
        self.fails.set(true);
    }
}

impl ScriptRunner for FakeScripts {
    fn run_script(&self, script: &Path, _cwd: &Path) -> Result<(), CommandError> {
        self.ran.borrow_mut().push(script.to_path_buf());
        if self.fails.get() {
            return Err(failed("bash", script.display().to_string(), "sync failed"));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSleeper {
    slept: RefCell<Vec<Duration>>,
}

impl FakeSleeper {
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.borrow().clone()
    }

    pub fn total(&self) -> Duration {
        self.slept.borrow().iter().sum()
    }
}

impl Sleeper for FakeSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// Fakes plus a config rooted in a temporary directory:
/// `<tmp>/home`, `<tmp>/work` (workspace) and `<tmp>/scan` (scan root).
pub struct Harness {
    _root: TempDir,
    pub config: Config,
    pub host: FakeHost,
    pub git: FakeGit,
    pub scripts: FakeScripts,
    pub sleeper: FakeSleeper,
    pub dry_run: bool,
}

impl Harness {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        let home = root.path().join("home");
        let work = root.path().join("work");
        let scan = root.path().join("scan");
        for dir in [&home, &work, &scan] {
            std::fs::create_dir_all(dir).unwrap();
        }

        let env = EnvSnapshot {
            active_account: None,
            scan_root_path: Some(scan),
        };
        let mut config = Config::load_at(&home, &work, &env, &ConfigOverrides::default()).unwrap();
        config.switch_backoff = BackoffSettings {
            initial: Duration::from_millis(1),
            max: Duration::from_millis(4),
            timeout: Duration::from_millis(20),
        };

        Self {
            _root: root,
            config,
            host: FakeHost::new(),
            git: FakeGit::default(),
            scripts: FakeScripts::default(),
            sleeper: FakeSleeper::default(),
            dry_run: false,
        }
    }

    pub fn ctx(&self) -> Context<'_> {
        Context {
            config: &self.config,
            host: &self.host,
            git: &self.git,
            scripts: &self.scripts,
            sleeper: &self.sleeper,
            dry_run: self.dry_run,
        }
    }

    /// Plain project directory in the workspace.
    pub fn local_dir(&self, project: &str) -> PathBuf {
        let dir = self.config.project_dir(project);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Project directory with `.git` metadata.
    pub fn local_git_dir(&self, project: &str) -> PathBuf {
        let dir = self.local_dir(project);
        std::fs::create_dir_all(dir.join(".git")).unwrap();
        dir
    }

    pub fn write_sync_script(&self, project: &str) -> PathBuf {
        self.local_dir(project);
        let script = self.config.sync_script_path(project);
        std::fs::write(&script, "#!/usr/bin/env bash\n").unwrap();
        script
    }

    /// Repository directory under the scan root.
    pub fn scan_git_dir(&self, name: &str) -> PathBuf {
        let dir = self.config.scan_root.join(name);
        std::fs::create_dir_all(dir.join(".git")).unwrap();
        dir
    }

    /// Write the accounts and projects lists into the workspace.
    pub fn write_lists(&self, accounts: &str, projects: &str) {
        std::fs::write(&self.config.accounts_file, accounts).unwrap();
        std::fs::write(&self.config.projects_file, projects).unwrap();
    }
}
