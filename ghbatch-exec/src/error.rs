//! Error types for ghbatch-exec.

use thiserror::Error;

/// An external command could not be run or reported failure.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The executable could not be started at all.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran and exited non-zero; `stderr` is the captured error text.
    #[error("`{program} {args}` exited with {}: {stderr}", exit_label(.code))]
    Failed {
        program: String,
        args: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The command succeeded but its output could not be decoded.
    #[error("unexpected output from `{program}`: {source}")]
    Decode {
        program: String,
        #[source]
        source: serde_json::Error,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}
