//! Error types for ghbatch-reconcile.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use ghbatch_core::{Account, ConfigError, ListError};
use ghbatch_exec::CommandError;

/// All errors that can arise while reconciling or scanning.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Missing or unreadable list file. Fatal before any processing.
    #[error("list error: {0}")]
    List(#[from] ListError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A `gh` / `git` / script call failed. Non-fatal at the project boundary.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The host never reported the requested account as active.
    #[error("account '{account}' still not active after {waited:?}")]
    AccountNotActive { account: Account, waited: Duration },
}

/// Convenience constructor for [`ReconcileError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ReconcileError {
    ReconcileError::Io {
        path: path.into(),
        source,
    }
}
