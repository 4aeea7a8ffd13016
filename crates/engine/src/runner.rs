// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Child process execution with deadlock-free output capture.
//!
//! Commands are structured argv launches — there is no shell-string
//! execution path anywhere in this module. Stdout and stderr are
//! drained concurrently in one multiplexed read loop, so a child that
//! fills one pipe while the reader blocks on the other can never wedge
//! the job.

use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Tag prepended to captured stdout lines.
const STDOUT_TAG: &str = "[out]";
/// Tag prepended to captured stderr lines.
const STDERR_TAG: &str = "[err]";

/// Errors from launching or capturing a command.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// An empty argv has nothing to launch.
    #[error("empty argv: nothing to run")]
    EmptyArgv,

    /// The child process could not be started.
    #[error("failed to spawn `{command}`: {source}")]
    SpawnFailed {
        /// The program that failed to start (argv\[0\]).
        command: String,
        /// Underlying OS error.
        source: io::Error,
    },

    /// Reading the child's output or writing the sink failed.
    #[error("failed to capture command output: {0}")]
    Capture(#[from] io::Error),

    /// The child exited with a non-zero code.
    ///
    /// Raised only after all captured output has been flushed to the
    /// sink — no output is lost on failure.
    #[error("`{}` exited with code {exit_code}", argv.join(" "))]
    CommandFailed {
        /// The full command line that failed.
        argv: Vec<String>,
        /// The non-zero exit code (`-1` if killed by a signal).
        exit_code: i32,
    },
}

/// When captured output reaches the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Accumulate and flush once, after the process exits.
    Buffered,
    /// Flush each line as it arrives.
    Live,
}

/// Destination for captured output lines.
///
/// The engine's sink is the running job's log file; tests use
/// `Vec<String>`.
pub trait CaptureSink: Send {
    /// Append one line to the sink.
    fn append(&mut self, line: &str) -> io::Result<()>;
}

impl CaptureSink for Vec<String> {
    fn append(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// A structured launch request. Never interpreted by a shell.
#[derive(Debug, Clone)]
pub struct ExecRequest {
    argv: Vec<String>,
    cwd: Option<PathBuf>,
    env: Vec<(String, String)>,
}

impl ExecRequest {
    /// Build a request from an argv sequence.
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// Set the working directory for the child.
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Add an environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// The full argument vector.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Human-readable command line for log body lines.
    pub fn display_line(&self) -> String {
        self.argv
            .iter()
            .map(|arg| {
                if arg.contains(char::is_whitespace) || arg.is_empty() {
                    format!("\"{arg}\"")
                } else {
                    arg.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Run a command, streaming its output into `sink`.
///
/// Both output pipes are drained concurrently regardless of mode. In
/// [`CaptureMode::Live`] every line reaches the sink as it arrives,
/// tagged `[out]` or `[err]`; in [`CaptureMode::Buffered`] the same
/// tagged lines are held back and flushed once after the process
/// exits. A non-zero exit becomes [`RunnerError::CommandFailed`], but
/// only after the flush.
pub async fn run(
    request: &ExecRequest,
    sink: &mut dyn CaptureSink,
    mode: CaptureMode,
) -> Result<i32, RunnerError> {
    let (program, args) = request.argv.split_first().ok_or(RunnerError::EmptyArgv)?;

    let span = tracing::info_span!(
        "job.run",
        cmd = %program,
        exit_code = tracing::field::Empty,
    );

    let mut command = tokio::process::Command::new(program);
    command.args(args);
    if let Some(dir) = &request.cwd {
        command.current_dir(dir);
    }
    for (key, value) in &request.env {
        command.env(key, value);
    }
    command.stdin(Stdio::null());
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let mut child = command.spawn().map_err(|source| RunnerError::SpawnFailed {
        command: program.clone(),
        source,
    })?;

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return Err(RunnerError::Capture(io::Error::other(
            "child stdio was not piped",
        )));
    };

    let mut out_lines = BufReader::new(stdout).lines();
    let mut err_lines = BufReader::new(stderr).lines();
    let mut out_open = true;
    let mut err_open = true;
    let mut held_back: Vec<String> = Vec::new();

    // Multiplexed drain: one loop over both pipes until each hits EOF.
    while out_open || err_open {
        let tagged = tokio::select! {
            line = out_lines.next_line(), if out_open => match line? {
                Some(line) => format!("{STDOUT_TAG} {line}"),
                None => {
                    out_open = false;
                    continue;
                }
            },
            line = err_lines.next_line(), if err_open => match line? {
                Some(line) => format!("{STDERR_TAG} {line}"),
                None => {
                    err_open = false;
                    continue;
                }
            },
        };
        match mode {
            CaptureMode::Live => sink.append(&tagged)?,
            CaptureMode::Buffered => held_back.push(tagged),
        }
    }

    let status = child.wait().await?;
    let exit_code = status.code().unwrap_or(-1);
    span.record("exit_code", exit_code);

    for line in held_back.drain(..) {
        sink.append(&line)?;
    }

    if exit_code != 0 {
        return Err(RunnerError::CommandFailed {
            argv: request.argv.clone(),
            exit_code,
        });
    }
    Ok(exit_code)
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
