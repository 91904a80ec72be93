//! [`ScriptRunner`] that hands scripts to a shell.

use std::path::Path;

use crate::error::CommandError;
use crate::process::run_checked;
use crate::ScriptRunner;

/// Runs `<shell> <script>` inside the project directory.
#[derive(Debug, Clone)]
pub struct ShellScriptRunner {
    shell: String,
}

impl Default for ShellScriptRunner {
    fn default() -> Self {
        Self {
            shell: "bash".to_string(),
        }
    }
}

impl ShellScriptRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl ScriptRunner for ShellScriptRunner {
    fn run_script(&self, script: &Path, cwd: &Path) -> Result<(), CommandError> {
        let output = run_checked(&self.shell, [script.as_os_str()], Some(cwd))?;
        if !output.is_empty() {
            tracing::debug!(script = %script.display(), "{output}");
        }
        Ok(())
    }
}
