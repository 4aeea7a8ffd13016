// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The owning state machine over one job's log file.
//!
//! Opening a monitor takes the job from pending to running; dropping
//! out of the scope finalizes it as done or failed. Every transition is
//! an atomic rename, so at any instant the job is represented by
//! exactly one file whose extension names its state.

use std::fs;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Instant;

use crate::error::JobError;
use crate::runner::{self, CaptureMode, CaptureSink, ExecRequest};
use joblog_core::{format_elapsed, log_stem, record, state_path, JobState, ResultLocator};

/// Boxed future for scope closures (borrows the monitor).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Sink that appends captured output to the running log file.
struct LogSink {
    path: PathBuf,
}

impl CaptureSink for LogSink {
    fn append(&mut self, line: &str) -> io::Result<()> {
        record::append_line(&self.path, line)
    }
}

/// Tracks one job's progress in its log file.
///
/// The target path must end in `.log`. While the job runs the file
/// carries the `.running` extension; [`JobMonitor::finish`] renames it
/// back to `.log` and [`JobMonitor::fail`] renames it to `.error` with
/// the error trace appended. Prefer [`JobMonitor::scope`], which
/// finalizes on every exit path.
#[derive(Debug)]
pub struct JobMonitor {
    name: String,
    stem: PathBuf,
    running: PathBuf,
    locator: ResultLocator,
    started: Instant,
}

impl JobMonitor {
    /// Open a job: write the log header and mark the job running.
    ///
    /// Parses `locator_spec`, creates the log's parent directories,
    /// writes the two-line header, and renames the file to its
    /// `.running` path. A stale `.error` report from a previous run of
    /// the same job is removed — re-running a job supersedes its old
    /// failure.
    pub fn open(
        log_path: impl AsRef<Path>,
        name: &str,
        locator_spec: &str,
    ) -> Result<Self, JobError> {
        let log_path = log_path.as_ref();
        let stem = log_stem(log_path).ok_or_else(|| JobError::NotALogPath {
            path: log_path.to_path_buf(),
        })?;
        let locator = ResultLocator::parse(locator_spec)?;

        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| JobError::io(parent, source))?;
            }
        }

        let pending = state_path(&stem, JobState::Pending);
        record::write_header(&pending, name, &locator)?;
        let running = state_path(&stem, JobState::Running);
        fs::rename(&pending, &running).map_err(|source| JobError::io(&running, source))?;

        let old_failure = state_path(&stem, JobState::Error);
        match fs::remove_file(&old_failure) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(JobError::io(&old_failure, source)),
        }

        tracing::debug!(job = name, log = %running.display(), "job running");
        Ok(Self {
            name: name.to_string(),
            stem,
            running,
            locator,
            started: Instant::now(),
        })
    }

    /// Open a job, run `f` against it, and finalize on every exit path.
    ///
    /// On `Ok` the log is renamed to its `.log` path; on `Err` the
    /// error trace is appended, the log becomes the `.error` report,
    /// and the original error is re-raised to the caller.
    pub async fn scope<T, F>(
        log_path: impl AsRef<Path>,
        name: &str,
        locator_spec: &str,
        f: F,
    ) -> Result<T, JobError>
    where
        F: for<'a> FnOnce(&'a mut JobMonitor) -> BoxFuture<'a, Result<T, JobError>>,
    {
        let mut monitor = JobMonitor::open(log_path, name, locator_spec)?;
        match f(&mut monitor).await {
            Ok(value) => {
                monitor.finish()?;
                Ok(value)
            }
            Err(error) => {
                // The caller's error wins; a failed finalization is
                // only worth a warning.
                if let Err(finalize) = monitor.fail(&error) {
                    tracing::warn!(error = %finalize, "failed to record job failure");
                }
                Err(error)
            }
        }
    }

    /// The job's name, as written on the log's description line.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The locator recovered from the spec this job was opened with.
    pub fn locator(&self) -> &ResultLocator {
        &self.locator
    }

    /// The `.running` file this monitor currently owns.
    pub fn running_path(&self) -> &Path {
        &self.running
    }

    /// Build a concrete result path; only legal while running.
    pub fn result<S: AsRef<str>>(&self, segments: &[S]) -> Result<PathBuf, JobError> {
        Ok(self.locator.build(segments)?)
    }

    /// Append an elapsed-stamped line to the log body.
    pub fn log(&self, message: &str) -> Result<(), JobError> {
        let line = format!("[{}] {message}", format_elapsed(self.started.elapsed()));
        self.append_raw(&line)
    }

    /// Run a command, streaming its output into this job's log.
    ///
    /// The command line is logged first. A non-zero exit propagates to
    /// the caller — never swallowed — so normal error propagation
    /// drives the job into the error state via [`JobMonitor::scope`].
    pub async fn run(
        &mut self,
        request: &ExecRequest,
        live_updates: bool,
    ) -> Result<i32, JobError> {
        self.log(&format!("running `{}`", request.display_line()))?;
        let mode = if live_updates {
            CaptureMode::Live
        } else {
            CaptureMode::Buffered
        };
        let mut sink = LogSink {
            path: self.running.clone(),
        };
        Ok(runner::run(request, &mut sink, mode).await?)
    }

    /// Fail this job if an upstream job it depends on has failed.
    ///
    /// Paths without the `.log` extension are ignored.
    pub fn check_dependency(&self, dependency_log: &Path) -> Result<(), JobError> {
        let stem = match log_stem(dependency_log) {
            Some(stem) => stem,
            None => return Ok(()),
        };
        let error_file = state_path(&stem, JobState::Error);
        if error_file.exists() {
            return Err(JobError::FailedDependency {
                job: self.name.clone(),
                error_file,
            });
        }
        Ok(())
    }

    /// Check every upstream dependency for a failure report.
    pub fn check_dependencies<'a, I>(&self, dependencies: I) -> Result<(), JobError>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        for dependency in dependencies {
            self.check_dependency(dependency)?;
        }
        Ok(())
    }

    /// Finalize as done: the running file becomes the `.log` file.
    ///
    /// Overwrites any stale log from an earlier run. Returns the final
    /// log path.
    pub fn finish(self) -> Result<PathBuf, JobError> {
        self.log(&format!(
            "\"{}\" completed in {}.",
            self.name,
            format_elapsed(self.started.elapsed())
        ))?;
        let done = state_path(&self.stem, JobState::Done);
        fs::rename(&self.running, &done).map_err(|source| JobError::io(&done, source))?;
        tracing::debug!(job = %self.name, log = %done.display(), "job done");
        Ok(done)
    }

    /// Finalize as failed: append the error trace, then rename the
    /// running file to the `.error` report.
    ///
    /// The running file is consumed by the rename — no stale `.running`
    /// file survives. Deleting the `.error` report is what makes the
    /// job re-runnable. Returns the report path.
    pub fn fail(self, error: &dyn std::error::Error) -> Result<PathBuf, JobError> {
        self.log(&format!(
            "\"{}\" failed after {}.",
            self.name,
            format_elapsed(self.started.elapsed())
        ))?;

        let mut detail = format!("error: {error}");
        let mut cause = error.source();
        while let Some(err) = cause {
            detail.push_str(&format!("\n  caused by: {err}"));
            cause = err.source();
        }
        self.append_raw(&detail)?;

        let failed = state_path(&self.stem, JobState::Error);
        fs::rename(&self.running, &failed).map_err(|source| JobError::io(&failed, source))?;
        tracing::debug!(job = %self.name, log = %failed.display(), "job failed");
        Ok(failed)
    }

    fn append_raw(&self, line: &str) -> Result<(), JobError> {
        record::append_line(&self.running, line).map_err(|source| JobError::io(&self.running, source))
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
