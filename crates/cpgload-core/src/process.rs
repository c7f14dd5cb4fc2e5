//! External command execution.

use std::path::Path;
use std::process::Command;

use tracing::{info, warn};

use crate::error::{CpgLoadError, CpgLoadResult};

/// Capability boundary for launching external commands.
///
/// The pipeline only ever needs "run to completion, give me stdout"; callers
/// that should not depend on a Joern installation take this trait instead of
/// spawning directly.
pub trait ProcessRunner {
    /// Run `program` with `args`, blocking until it exits.
    ///
    /// Returns captured stdout on success. A nonzero exit status maps to
    /// [`CpgLoadError::CommandFailed`] carrying captured stderr; a missing
    /// binary maps to [`CpgLoadError::CommandNotFound`].
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> CpgLoadResult<String>;
}

/// Production runner backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> CpgLoadResult<String> {
        info!("Running command: {} {}", program, args.join(" "));

        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CpgLoadError::CommandNotFound(program.to_string())
            } else {
                CpgLoadError::Io(e)
            }
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !stdout.trim().is_empty() {
            info!("Command stdout:\n{}", stdout.trim_end());
        }
        if !stderr.trim().is_empty() {
            warn!("Command stderr:\n{}", stderr.trim_end());
        }

        if !output.status.success() {
            let reason = if stderr.trim().is_empty() {
                format!("exit status {}", output.status)
            } else {
                stderr.trim().to_string()
            };
            return Err(CpgLoadError::command_failed(program, reason));
        }

        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_on_success() {
        let out = SystemRunner.run("echo", &["hello"], None).unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn nonzero_exit_is_command_failed() {
        let err = SystemRunner
            .run("sh", &["-c", "echo oops >&2; exit 3"], None)
            .unwrap_err();
        match err {
            CpgLoadError::CommandFailed { program, stderr } => {
                assert_eq!(program, "sh");
                assert!(stderr.contains("oops"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nonzero_exit_without_stderr_gets_placeholder() {
        let err = SystemRunner.run("sh", &["-c", "exit 1"], None).unwrap_err();
        match err {
            CpgLoadError::CommandFailed { stderr, .. } => {
                assert!(stderr.contains("exit status"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_binary_is_command_not_found() {
        let err = SystemRunner
            .run("definitely-not-a-real-binary-4242", &[], None)
            .unwrap_err();
        assert!(matches!(err, CpgLoadError::CommandNotFound(_)));
    }

    #[test]
    fn respects_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = SystemRunner.run("pwd", &[], Some(dir.path())).unwrap();
        let reported = std::fs::canonicalize(out.trim()).unwrap();
        let expected = std::fs::canonicalize(dir.path()).unwrap();
        assert_eq!(reported, expected);
    }
}
