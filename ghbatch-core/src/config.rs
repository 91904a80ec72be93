//! Run configuration.
//!
//! Resolved once at startup and passed by reference; nothing below the CLI
//! reads the process environment.
//!
//! # Sources (later wins)
//!
//! ```text
//! defaults
//!   <home>/.ghbatch/config.yaml   (optional)
//!     ACTIVE_ACCOUNT / SCAN_ROOT_PATH
//!       CLI overrides (--workspace, --root)
//! ```
//!
//! As with the registry helpers, `load_at` takes explicit `home` / `cwd` and
//! is what tests call; `load` derives both from the process.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::Account;

pub const CONFIG_DIR: &str = ".ghbatch";
pub const CONFIG_FILE: &str = "config.yaml";

pub const ENV_ACTIVE_ACCOUNT: &str = "ACTIVE_ACCOUNT";
pub const ENV_SCAN_ROOT_PATH: &str = "SCAN_ROOT_PATH";

const DEFAULT_SCAN_DIR: &str = "Projects";
const DEFAULT_ACCOUNTS_FILE: &str = "accounts.txt";
const DEFAULT_PROJECTS_FILE: &str = "projects.txt";
const DEFAULT_LOGS_DIR: &str = "logs";
const DEFAULT_EXPORTED_FILE: &str = "exported-projects.txt";
const DEFAULT_SYNC_SCRIPT: &str = "sync.sh";

pub const CREATE_LOG: &str = "create.log";
pub const REMOTES_LOG: &str = "remotes.log";
pub const REMOTES_DEBUG_LOG: &str = "remotes-debug.log";

/// Polling schedule used after switching the active account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffSettings {
    pub initial: Duration,
    pub max: Duration,
    pub timeout: Duration,
}

impl Default for BackoffSettings {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(250),
            max: Duration::from_millis(2000),
            timeout: Duration::from_millis(10_000),
        }
    }
}

/// Environment values relevant to configuration, captured once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    pub active_account: Option<String>,
    pub scan_root_path: Option<PathBuf>,
}

impl EnvSnapshot {
    pub fn from_process() -> Self {
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            active_account: non_empty(ENV_ACTIVE_ACCOUNT),
            scan_root_path: non_empty(ENV_SCAN_ROOT_PATH).map(PathBuf::from),
        }
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub workspace_dir: Option<PathBuf>,
    pub scan_root: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct BackoffFile {
    initial_ms: Option<u64>,
    max_ms: Option<u64>,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    active_account: Option<String>,
    scan_root: Option<PathBuf>,
    workspace_dir: Option<PathBuf>,
    accounts_file: Option<PathBuf>,
    projects_file: Option<PathBuf>,
    logs_dir: Option<PathBuf>,
    exported_projects_file: Option<PathBuf>,
    sync_script: Option<PathBuf>,
    switch_backoff: Option<BackoffFile>,
}

/// Immutable configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Primary account; `None` means "first entry of the accounts list".
    pub active_account: Option<Account>,
    pub scan_root: PathBuf,
    /// Directory holding the per-project working directories.
    pub workspace_dir: PathBuf,
    pub accounts_file: PathBuf,
    pub projects_file: PathBuf,
    pub logs_dir: PathBuf,
    pub exported_projects_file: PathBuf,
    /// Script name looked up inside each project directory.
    pub sync_script: PathBuf,
    pub switch_backoff: BackoffSettings,
}

/// `<home>/.ghbatch/config.yaml`: pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(CONFIG_DIR).join(CONFIG_FILE)
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve(base: &Path, value: Option<PathBuf>, default: &str) -> PathBuf {
    let path = value.unwrap_or_else(|| PathBuf::from(default));
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

impl Config {
    /// Resolve configuration from an explicit home, working directory and
    /// environment snapshot.
    pub fn load_at(
        home: &Path,
        cwd: &Path,
        env: &EnvSnapshot,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let file = read_config_file(&config_path_at(home))?;

        let workspace_dir = match overrides.workspace_dir.clone().or(file.workspace_dir) {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => cwd.join(dir),
            None => cwd.to_path_buf(),
        };

        // CLI and env paths are relative to the cwd, file paths to the workspace.
        let scan_root = match overrides.scan_root.clone().or_else(|| env.scan_root_path.clone()) {
            Some(p) if p.is_absolute() => p,
            Some(p) => cwd.join(p),
            None => match file.scan_root {
                Some(p) => resolve(&workspace_dir, Some(p), DEFAULT_SCAN_DIR),
                None => home.join(DEFAULT_SCAN_DIR),
            },
        };

        let active_account = env
            .active_account
            .clone()
            .or(file.active_account)
            .map(Account::from);

        let defaults = BackoffSettings::default();
        let switch_backoff = match file.switch_backoff {
            Some(b) => BackoffSettings {
                initial: b.initial_ms.map(Duration::from_millis).unwrap_or(defaults.initial),
                max: b.max_ms.map(Duration::from_millis).unwrap_or(defaults.max),
                timeout: b.timeout_ms.map(Duration::from_millis).unwrap_or(defaults.timeout),
            },
            None => defaults,
        };

        Ok(Self {
            active_account,
            scan_root,
            accounts_file: resolve(&workspace_dir, file.accounts_file, DEFAULT_ACCOUNTS_FILE),
            projects_file: resolve(&workspace_dir, file.projects_file, DEFAULT_PROJECTS_FILE),
            logs_dir: resolve(&workspace_dir, file.logs_dir, DEFAULT_LOGS_DIR),
            exported_projects_file: resolve(
                &workspace_dir,
                file.exported_projects_file,
                DEFAULT_EXPORTED_FILE,
            ),
            sync_script: file
                .sync_script
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SYNC_SCRIPT)),
            switch_backoff,
            workspace_dir,
        })
    }

    /// `load_at` with `home` from `dirs::home_dir()` and the process working directory.
    pub fn load(env: &EnvSnapshot, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        Self::load_at(&home, &cwd, env, overrides)
    }

    /// `<workspace>/<project>`: the local working directory for a project.
    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.workspace_dir.join(project)
    }

    /// `<workspace>/<project>/<sync_script>`.
    pub fn sync_script_path(&self, project: &str) -> PathBuf {
        self.project_dir(project).join(&self.sync_script)
    }

    pub fn create_log_path(&self) -> PathBuf {
        self.logs_dir.join(CREATE_LOG)
    }

    pub fn remotes_log_path(&self) -> PathBuf {
        self.logs_dir.join(REMOTES_LOG)
    }

    pub fn remotes_debug_log_path(&self) -> PathBuf {
        self.logs_dir.join(REMOTES_DEBUG_LOG)
    }

    /// The configured primary account, falling back to the first listed one.
    pub fn primary_account(&self, accounts: &[Account]) -> Option<Account> {
        self.active_account
            .clone()
            .or_else(|| accounts.first().cloned())
    }
}
