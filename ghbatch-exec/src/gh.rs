//! [`RemoteHost`] over the `gh` command-line client.

use std::ffi::OsString;

use serde::Deserialize;

use ghbatch_core::{Account, Description, RemoteRepositoryState, RepoSlug};

use crate::error::CommandError;
use crate::process::{failure, run, run_checked};
use crate::{CreateRequest, RemoteHost};

const GH: &str = "gh";
const VIEW_FIELDS: &str = "nameWithOwner,description,isPrivate,isFork";

/// `gh`-backed remote host. Stateless; every call is a fresh subprocess.
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
}

impl Default for GhCli {
    fn default() -> Self {
        Self {
            program: GH.to_string(),
        }
    }
}

impl GhCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable (a wrapper script, a pinned path).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepoViewJson {
    name_with_owner: String,
    #[serde(default)]
    description: Option<String>,
    is_private: bool,
    is_fork: bool,
}

/// Decode `gh repo view --json` output. An empty description means none.
pub(crate) fn decode_repo_view(
    requested: &RepoSlug,
    stdout: &str,
) -> Result<RemoteRepositoryState, serde_json::Error> {
    let json: RepoViewJson = serde_json::from_str(stdout)?;
    let full_name = json
        .name_with_owner
        .split_once('/')
        .map(|(owner, name)| RepoSlug::new(owner, name))
        .unwrap_or_else(|| requested.clone());
    Ok(RemoteRepositoryState {
        full_name,
        description: json
            .description
            .filter(|d| !d.is_empty())
            .map(|d| Description::parse(&d)),
        is_private: json.is_private,
        is_fork: json.is_fork,
    })
}

/// `gh repo view` reports a missing repository on stderr with a non-zero exit.
pub(crate) fn is_not_found(stderr: &str) -> bool {
    let lower = stderr.to_lowercase();
    lower.contains("could not resolve to a repository") || lower.contains("http 404")
}

/// Full argument list for `gh repo create`.
pub(crate) fn create_args(request: &CreateRequest) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["repo".into(), "create".into(), request.slug.to_string().into()];
    args.extend(request.args.iter().map(OsString::from));
    if let Some(source) = &request.source {
        args.push("--source".into());
        args.push(source.directory.clone().into_os_string());
        args.push("--remote".into());
        args.push(source.remote_name.clone().into());
        if source.push {
            args.push("--push".into());
        }
    }
    args
}

impl RemoteHost for GhCli {
    fn switch_account(&self, account: &Account) -> Result<(), CommandError> {
        run_checked(&self.program, ["auth", "switch", "--user", account.0.as_str()], None)?;
        Ok(())
    }

    fn active_account(&self) -> Result<Option<Account>, CommandError> {
        let login = run_checked(&self.program, ["api", "user", "--jq", ".login"], None)?;
        Ok(Some(login).filter(|l| !l.is_empty()).map(Account::from))
    }

    fn repo_view(&self, slug: &RepoSlug) -> Result<Option<RemoteRepositoryState>, CommandError> {
        let target = slug.to_string();
        let args = ["repo", "view", target.as_str(), "--json", VIEW_FIELDS];
        let output = run(&self.program, args, None)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_not_found(&stderr) {
                return Ok(None);
            }
            return Err(failure(&self.program, &args, &output));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        decode_repo_view(slug, &stdout)
            .map(Some)
            .map_err(|source| CommandError::Decode {
                program: self.program.clone(),
                source,
            })
    }

    fn repo_create(&self, request: &CreateRequest) -> Result<(), CommandError> {
        run_checked(&self.program, create_args(request), None)?;
        Ok(())
    }

    fn repo_edit_description(
        &self,
        slug: &RepoSlug,
        description: &Description,
    ) -> Result<(), CommandError> {
        let target = slug.to_string();
        let wire = description.to_wire();
        run_checked(
            &self.program,
            ["repo", "edit", target.as_str(), "--description", wire.as_str()],
            None,
        )?;
        Ok(())
    }
}
