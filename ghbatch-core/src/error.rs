//! Error types for ghbatch-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading the account / project lists.
#[derive(Debug, Error)]
pub enum ListError {
    /// The list file does not exist. Fatal for the whole run.
    #[error("list file not found at {path}")]
    MissingFile { path: PathBuf },

    /// The file exists but could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A project line that does not match the expected grammar.
///
/// Callers skip these silently; hand-edited lists are expected to contain them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("empty line")]
    Empty,

    #[error("unterminated {quote} quote")]
    UnterminatedQuote { quote: char },

    #[error("invalid project name '{name}'")]
    InvalidName { name: String },

    #[error("expected a flag, found '{token}'")]
    UnexpectedToken { token: String },
}

/// Errors from resolving the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config YAML parse error: includes file path and serde_yaml's location.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// The process working directory could not be resolved.
    #[error("cannot determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}
