//! Domain types for ghbatch.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::marker::Description;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// An account handle with an already-authenticated credential context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account(pub String);

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Account {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Account {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// `owner/name` address of a remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// ---------------------------------------------------------------------------
// Project specs
// ---------------------------------------------------------------------------

/// Flags that pick a repository visibility; one of them is always present
/// in a parsed [`ProjectSpec`].
pub const VISIBILITY_FLAGS: [&str; 3] = ["public", "private", "internal"];

/// A single `--key[=value]` flag from a project line. `key` has no leading dashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub key: String,
    pub value: Option<String>,
}

impl Flag {
    pub fn switch(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// Command-line arguments for this flag (`--key` and, if set, the value).
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![format!("--{}", self.key)];
        if let Some(value) = &self.value {
            args.push(value.clone());
        }
        args
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "--{}={}", self.key, value),
            None => write!(f, "--{}", self.key),
        }
    }
}

/// One parsed line of the projects list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSpec {
    /// Repository name; never contains whitespace.
    pub name: String,
    /// Flags other than `--description`, in file order.
    pub flags: Vec<Flag>,
    /// Sanitized description lifted out of the flags.
    pub description: Option<Description>,
}

impl ProjectSpec {
    /// Extra arguments for the remote create call: flags in order, then
    /// `--description <wire form>` when a description is present.
    pub fn create_args(&self) -> Vec<String> {
        let mut args: Vec<String> = self.flags.iter().flat_map(Flag::to_args).collect();
        if let Some(description) = &self.description {
            args.push("--description".to_string());
            args.push(description.to_wire());
        }
        args
    }

    pub fn visibility(&self) -> Option<&str> {
        self.flags
            .iter()
            .map(|f| f.key.as_str())
            .find(|k| VISIBILITY_FLAGS.contains(k))
    }
}

// ---------------------------------------------------------------------------
// Remote state
// ---------------------------------------------------------------------------

/// Point-in-time snapshot of a remote repository. Never cached across pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepositoryState {
    pub full_name: RepoSlug,
    pub description: Option<Description>,
    pub is_private: bool,
    pub is_fork: bool,
}

impl RemoteRepositoryState {
    pub fn marker(&self) -> crate::marker::Marker {
        self.description
            .as_ref()
            .map(|d| d.marker)
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Local links
// ---------------------------------------------------------------------------

/// Direction column of a `git remote -v` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Fetch,
    Push,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Fetch => write!(f, "fetch"),
            Direction::Push => write!(f, "push"),
        }
    }
}

/// One `(name, url, direction)` row of a local remote listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    pub url: String,
    pub direction: Direction,
}

impl fmt::Display for RemoteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{} ({})", self.name, self.url, self.direction)
    }
}

/// Classification of a local directory's remote entries by count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkShape {
    /// No remote entries.
    Unlinked,
    /// Exactly one fetch + push pair.
    Standard,
    /// Any other count; more than two is ambiguous.
    Irregular(usize),
}

/// A local working directory and its remote linkage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRepoLink {
    pub directory: PathBuf,
    pub has_git_metadata: bool,
    pub remotes: Vec<RemoteEntry>,
}

impl LocalRepoLink {
    pub fn shape(&self) -> LinkShape {
        match self.remotes.len() {
            0 => LinkShape::Unlinked,
            2 => LinkShape::Standard,
            n => LinkShape::Irregular(n),
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        self.remotes.len() > 2
    }

    pub fn has_origin(&self) -> bool {
        self.remotes.iter().any(|r| r.name == "origin")
    }

    /// URL of the first fetch entry, if any.
    pub fn fetch_url(&self) -> Option<&str> {
        self.remotes
            .iter()
            .find(|r| r.direction == Direction::Fetch)
            .map(|r| r.url.as_str())
    }

    /// `name=url` pairs of the fetch entries, for diagnostics.
    pub fn summary(&self) -> String {
        if self.remotes.is_empty() {
            return "none".to_string();
        }
        self.remotes
            .iter()
            .filter(|r| r.direction == Direction::Fetch)
            .map(|r| format!("{}={}", r.name, r.url))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::Marker;

    fn entry(name: &str, direction: Direction) -> RemoteEntry {
        RemoteEntry {
            name: name.to_string(),
            url: format!("git@github.com:alice/{name}.git"),
            direction,
        }
    }

    fn link(remotes: Vec<RemoteEntry>) -> LocalRepoLink {
        LocalRepoLink {
            directory: PathBuf::from("/code/repo"),
            has_git_metadata: true,
            remotes,
        }
    }

    #[test]
    fn slug_display() {
        assert_eq!(RepoSlug::new("alice", "repoX").to_string(), "alice/repoX");
        assert_eq!(Account::from("bob").to_string(), "bob");
    }

    #[test]
    fn link_shape_by_entry_count() {
        assert_eq!(link(vec![]).shape(), LinkShape::Unlinked);
        let standard = link(vec![
            entry("origin", Direction::Fetch),
            entry("origin", Direction::Push),
        ]);
        assert_eq!(standard.shape(), LinkShape::Standard);
        assert!(standard.has_origin());
        assert!(!standard.is_ambiguous());

        let ambiguous = link(vec![
            entry("origin", Direction::Fetch),
            entry("origin", Direction::Push),
            entry("upstream", Direction::Fetch),
            entry("upstream", Direction::Push),
        ]);
        assert_eq!(ambiguous.shape(), LinkShape::Irregular(4));
        assert!(ambiguous.is_ambiguous());
        assert_eq!(
            ambiguous.summary(),
            "origin=git@github.com:alice/origin.git, upstream=git@github.com:alice/upstream.git"
        );
    }

    #[test]
    fn create_args_append_wire_description() {
        let spec = ProjectSpec {
            name: "repoX".to_string(),
            flags: vec![Flag::switch("public"), Flag::with_value("homepage", "https://x.dev")],
            description: Some(Description::new(Marker::NeedsAttention, "line1 line2")),
        };
        assert_eq!(
            spec.create_args(),
            vec![
                "--public",
                "--homepage",
                "https://x.dev",
                "--description",
                "⁉️ line1 line2"
            ]
        );
        assert_eq!(spec.visibility(), Some("public"));
    }

    #[test]
    fn remote_state_marker_defaults_to_unmarked() {
        let state = RemoteRepositoryState {
            full_name: RepoSlug::new("alice", "r"),
            description: None,
            is_private: false,
            is_fork: false,
        };
        assert_eq!(state.marker(), Marker::Unmarked);
    }
}
