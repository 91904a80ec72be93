//! Flat text lists of accounts and projects.
//!
//! One entry per line. Blank lines and lines whose first non-whitespace
//! character is `#` are ignored. Order is preserved and duplicates are kept.
//! A missing file is [`ListError::MissingFile`]; no default list is made up.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::{ListError, ParseFailure};
use crate::grammar::parse_project_line;
use crate::types::{Account, ProjectSpec};

/// A project line the grammar rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    pub line: String,
    pub reason: ParseFailure,
}

/// Parsed projects list.
#[derive(Debug, Clone, Default)]
pub struct ProjectList {
    pub projects: Vec<ProjectSpec>,
    pub rejected: Vec<RejectedLine>,
}

/// Non-empty, non-comment lines of `contents`, trimmed.
pub fn entries(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Read `path` and return its entries.
pub fn load_lines(path: &Path) -> Result<Vec<String>, ListError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(ListError::MissingFile {
                path: path.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(ListError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    Ok(entries(&contents))
}

/// Load the accounts list. Only the first token of each line is used.
pub fn load_accounts(path: &Path) -> Result<Vec<Account>, ListError> {
    Ok(load_lines(path)?
        .into_iter()
        .filter_map(|line| line.split_whitespace().next().map(Account::from))
        .collect())
}

/// Parse already-loaded project lines; rejected lines are collected, not fatal.
pub fn parse_projects(lines: Vec<String>) -> ProjectList {
    let mut list = ProjectList::default();
    for line in lines {
        match parse_project_line(&line) {
            Ok(spec) => list.projects.push(spec),
            Err(reason) => {
                tracing::debug!(line = %line, reason = %reason, "skipping project line");
                list.rejected.push(RejectedLine { line, reason });
            }
        }
    }
    list
}

/// Load and parse the projects list.
pub fn load_projects(path: &Path) -> Result<ProjectList, ListError> {
    Ok(parse_projects(load_lines(path)?))
}
