//! # ghbatch-reconcile
//!
//! The reconciliation engine. For every (account, project) pair it classifies
//! the remote repository and creates what is missing; a second pass over the
//! primary account's repositories drives the description-marker state machine
//! and the per-project sync-and-commit step. [`scan`] runs the same classifier
//! in the other direction and exports qualifying local repositories back into
//! a projects list.
//!
//! Everything is sequential and blocking. Per-project failures are logged to
//! the [`RunLog`] and never abort the batch.

pub mod account;
pub mod classify;
mod context;
pub mod error;
pub mod marker_pass;
pub mod orchestrator;
pub mod pipeline;
pub mod planner;
pub mod run_log;
pub mod scan;

#[cfg(test)]
mod fakes;

pub use account::{activate, Sleeper, ThreadSleeper};
pub use classify::{Classification, Disposition};
pub use context::Context;
pub use error::ReconcileError;
pub use pipeline::{load_inputs, Inputs, RunSummary};
pub use run_log::{LogEntry, Reporter, RunLog, Tag, TextLog};
pub use scan::{ScanLogs, ScanReport};
