// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only access to a finished job's results.
//!
//! Downstream jobs consume a predecessor's *log file*, not its results
//! directly: [`JobResult`] parses the log header, recovers the result
//! locator, and builds result paths from it. It never mutates job
//! state and has no running/done/error concept of its own.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::JobError;
use joblog_core::{parse_header, ResultLocator};

/// A completed job's parsed log header.
#[derive(Debug)]
pub struct JobResult {
    description: String,
    locator: ResultLocator,
}

impl JobResult {
    /// Parse the header of a finished log file.
    ///
    /// Fails if the file is missing, truncated, or its locator line
    /// does not parse.
    pub fn open(log_path: impl AsRef<Path>) -> Result<Self, JobError> {
        let (description, locator) = parse_header(log_path.as_ref())?;
        Ok(Self {
            description,
            locator,
        })
    }

    /// The description line the job was opened with.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The recovered result locator.
    pub fn locator(&self) -> &ResultLocator {
        &self.locator
    }

    /// Build a result path, same contract as the monitor's `result`.
    pub fn result<S: AsRef<str>>(&self, segments: &[S]) -> Result<PathBuf, JobError> {
        Ok(self.locator.build(segments)?)
    }

    /// The directory component of a built result path.
    pub fn folder<S: AsRef<str>>(&self, segments: &[S]) -> Result<PathBuf, JobError> {
        let path = self.result(segments)?;
        Ok(path.parent().map(Path::to_path_buf).unwrap_or_default())
    }

    /// Read a result file and decode it as JSON.
    pub fn parse_json<S: AsRef<str>>(&self, segments: &[S]) -> Result<serde_json::Value, JobError> {
        let path = self.result(segments)?;
        let contents =
            fs::read_to_string(&path).map_err(|source| JobError::io(&path, source))?;
        serde_json::from_str(&contents)
            .map_err(|source| JobError::MalformedResult { path, source })
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
