// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for job execution and result reading.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::runner::RunnerError;
use joblog_core::{LocatorError, RecordError};

/// Errors surfaced by [`crate::JobMonitor`] and [`crate::JobResult`].
///
/// Nothing here is retried: failures are recorded durably in the job's
/// log file and re-raised so the host scheduler halts or reroutes.
#[derive(Debug, Error)]
pub enum JobError {
    /// The job log path did not carry the `.log` extension.
    #[error("job log path must end in .log: {path}")]
    NotALogPath {
        /// The offending path.
        path: PathBuf,
    },

    /// The result locator spec was unparseable, or a result path could
    /// not be built.
    #[error(transparent)]
    Locator(#[from] LocatorError),

    /// The log record could not be written or parsed.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// A launched command failed to spawn, capture, or exit cleanly.
    #[error(transparent)]
    Runner(#[from] RunnerError),

    /// Filesystem failure on a job file.
    #[error("job file {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying filesystem error.
        source: std::io::Error,
    },

    /// An upstream job this one depends on has a failure report.
    #[error("\"{job}\" depends on a failed job: {error_file}")]
    FailedDependency {
        /// The dependent job's name.
        job: String,
        /// The upstream failure report.
        error_file: PathBuf,
    },

    /// A result file existed but did not decode as JSON.
    #[error("malformed result {path}: {source}")]
    MalformedResult {
        /// The result file.
        path: PathBuf,
        /// The decode failure.
        source: serde_json::Error,
    },
}

impl JobError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        JobError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
