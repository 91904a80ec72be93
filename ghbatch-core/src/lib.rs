//! ghbatch core library: domain types, list loading, description handling,
//! configuration, errors.
//!
//! - [`types`]: accounts, project specs, remote state, local links
//! - [`marker`]: [`Marker`] and the tagged [`Description`]
//! - [`sanitize`]: control-character cleanup for descriptions
//! - [`grammar`]: project-line tokenizer and flag parser
//! - [`lists`]: account / project list loading
//! - [`config`]: immutable run configuration

pub mod config;
pub mod error;
pub mod grammar;
pub mod lists;
pub mod marker;
pub mod sanitize;
pub mod types;

pub use config::{BackoffSettings, Config, ConfigOverrides, EnvSnapshot};
pub use error::{ConfigError, ListError, ParseFailure};
pub use lists::{ProjectList, RejectedLine};
pub use marker::{Description, Marker};
pub use types::{
    Account, Direction, Flag, LinkShape, LocalRepoLink, ProjectSpec, RemoteEntry,
    RemoteRepositoryState, RepoSlug,
};
