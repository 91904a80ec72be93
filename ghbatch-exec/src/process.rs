//! Blocking subprocess helpers shared by the `gh` and `git` adapters.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

use crate::error::CommandError;

/// Run `program args…` to completion, optionally in `cwd`. Non-zero exit is
/// not an error here; see [`run_checked`].
pub(crate) fn run<I, S>(program: &str, args: I, cwd: Option<&Path>) -> Result<Output, CommandError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }
    tracing::debug!(command = ?command, "running");
    command.output().map_err(|source| CommandError::Spawn {
        program: program.to_string(),
        source,
    })
}

/// Run and require success; returns trimmed stdout.
pub(crate) fn run_checked<I, S>(
    program: &str,
    args: I,
    cwd: Option<&Path>,
) -> Result<String, CommandError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<S> = args.into_iter().collect();
    let output = run(program, &args, cwd)?;
    if !output.status.success() {
        return Err(failure(program, &args, &output));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Build a [`CommandError::Failed`] from a finished command.
pub(crate) fn failure<S: AsRef<OsStr>>(program: &str, args: &[S], output: &Output) -> CommandError {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let stderr = if stderr.is_empty() {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    } else {
        stderr
    };
    CommandError::Failed {
        program: program.to_string(),
        args: args
            .iter()
            .map(|a| a.as_ref().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" "),
        code: output.status.code(),
        stderr,
    }
}
