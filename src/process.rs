//! Command execution.
//!
//! Generic argv runner used by every git wrapper in this crate. Callers
//! choose whether the child inherits the parent's standard streams or has
//! them captured; captured output is the only parseable kind.

use colored::Colorize;
use std::path::Path;
use std::process::{Command, Stdio};

/// Callback invoked with the rendered command line before each invocation.
pub type GitLogger = fn(&str);

/// Logger that prints each command to stderr, dimmed.
pub fn verbose_logger(msg: &str) {
    eprintln!("  {}", format!("$ {}", msg).dimmed());
}

/// Logger that discards everything.
pub fn no_op_logger(_msg: &str) {}

/// Stream handling for a spawned command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdioMode {
    /// Capture stdout and stderr for inspection by the caller.
    #[default]
    Capture,
    /// Wire the child to the parent's streams. Captured stdout and stderr
    /// are empty in this mode, so the output cannot be parsed.
    Inherit,
}

/// Result of a completed command.
///
/// Consumed immediately by the caller; nothing here is retained by the
/// library between calls.
#[derive(Debug, Clone)]
pub struct CmdOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CmdOutput {
    /// Stdout with surrounding whitespace removed.
    #[must_use]
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }
}

/// Failure modes of [`run_command`].
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Failed to spawn command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command `{command}` exited with {}: {stderr}", exit_label(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "signal".to_string(),
    }
}

fn render(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Runs `program` with `args` in `cwd`, blocking until the child exits.
///
/// Returns `Err(CommandError::Failed)` on non-zero exit; callers that treat
/// a specific failure as a valid negative answer catch it at the call site.
/// No timeout is imposed: a hung child hangs the call.
pub fn run_command(
    cwd: &Path,
    program: &str,
    args: &[&str],
    stdio: StdioMode,
    log: GitLogger,
) -> Result<CmdOutput, CommandError> {
    let command = render(program, args);
    log(&command);

    let mut cmd = Command::new(program);
    cmd.current_dir(cwd).args(args);

    let output = match stdio {
        StdioMode::Capture => {
            let output = cmd.output().map_err(|source| CommandError::Spawn {
                command: command.clone(),
                source,
            })?;
            CmdOutput {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
        }
        StdioMode::Inherit => {
            let status = cmd
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .map_err(|source| CommandError::Spawn {
                    command: command.clone(),
                    source,
                })?;
            CmdOutput {
                code: status.code(),
                stdout: String::new(),
                stderr: String::new(),
            }
        }
    };

    if output.code == Some(0) {
        Ok(output)
    } else {
        Err(CommandError::Failed {
            command,
            code: output.code,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
