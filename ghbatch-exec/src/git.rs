//! [`LocalGit`] over the `git` executable.

use std::path::Path;

use ghbatch_core::{Direction, RemoteEntry};

use crate::error::CommandError;
use crate::process::run_checked;
use crate::LocalGit;

const GIT: &str = "git";

/// `git`-backed working-tree operations. Every call runs in the given directory.
#[derive(Debug, Clone, Default)]
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }
}

/// Parse `git remote -v` output. Lines that do not have the
/// `<name> <url> (fetch|push)` shape are dropped.
pub fn parse_remote_listing(output: &str) -> Vec<RemoteEntry> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let name = parts.next()?;
            let url = parts.next()?;
            let direction = match parts.next()? {
                "(fetch)" => Direction::Fetch,
                "(push)" => Direction::Push,
                _ => return None,
            };
            Some(RemoteEntry {
                name: name.to_string(),
                url: url.to_string(),
                direction,
            })
        })
        .collect()
}

impl LocalGit for GitCli {
    fn remote_list(&self, dir: &Path) -> Result<Vec<RemoteEntry>, CommandError> {
        let stdout = run_checked(GIT, ["remote", "-v"], Some(dir))?;
        Ok(parse_remote_listing(&stdout))
    }

    fn init(&self, dir: &Path, branch: &str) -> Result<(), CommandError> {
        run_checked(GIT, ["init", "-b", branch], Some(dir))?;
        Ok(())
    }

    fn add_all(&self, dir: &Path) -> Result<(), CommandError> {
        run_checked(GIT, ["add", "-A"], Some(dir))?;
        Ok(())
    }

    fn commit(&self, dir: &Path, message: &str) -> Result<(), CommandError> {
        run_checked(GIT, ["commit", "-m", message], Some(dir))?;
        Ok(())
    }

    fn has_changes(&self, dir: &Path) -> Result<bool, CommandError> {
        let stdout = run_checked(GIT, ["status", "--porcelain"], Some(dir))?;
        Ok(!stdout.is_empty())
    }

    fn pull_rebase(&self, dir: &Path) -> Result<(), CommandError> {
        run_checked(GIT, ["pull", "--rebase"], Some(dir))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fetch_push_pairs_in_order() {
        let out = "origin\tgit@github.com:alice/r.git (fetch)\n\
                   origin\tgit@github.com:alice/r.git (push)\n\
                   upstream\thttps://github.com/up/r.git (fetch)\n";
        let entries = parse_remote_listing(out);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].direction, Direction::Fetch);
        assert_eq!(entries[1].direction, Direction::Push);
        assert_eq!(entries[2].name, "upstream");
    }

    #[test]
    fn empty_and_malformed_lines_are_dropped() {
        assert!(parse_remote_listing("").is_empty());
        assert!(parse_remote_listing("origin only-two-columns\norigin url (mirror)").is_empty());
    }
}
