//! Local directory inspection.

use std::path::Path;

use ghbatch_core::LocalRepoLink;

use crate::{CommandError, LocalGit};

/// Describe the local working directory at `dir`.
///
/// Returns `Ok(None)` when `dir` is not a directory. Remotes are only listed
/// when `.git` metadata is present.
pub fn inspect_local(git: &dyn LocalGit, dir: &Path) -> Result<Option<LocalRepoLink>, CommandError> {
    if !dir.is_dir() {
        return Ok(None);
    }
    let has_git_metadata = dir.join(".git").exists();
    let remotes = if has_git_metadata {
        git.remote_list(dir)?
    } else {
        Vec::new()
    };
    Ok(Some(LocalRepoLink {
        directory: dir.to_path_buf(),
        has_git_metadata,
        remotes,
    }))
}
