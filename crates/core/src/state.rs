// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job lifecycle states, encoded on disk as file extensions.
//!
//! A job owns exactly one file at any time. Listing a run directory by
//! extension partitions it into not-yet-started (no file), in-progress
//! (`.running`), completed (`.log`) and failed (`.error`) jobs — even
//! mid-run. Every transition is an atomic rename, so a half-written
//! file can never be mistaken for a finished log.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Lifecycle state of a job.
///
/// `Pending → Running → {Done, Error}`. Done and Error are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Header written, job not yet marked running (transient).
    Pending,
    /// Job is executing; output is being appended.
    Running,
    /// Job completed cleanly.
    Done,
    /// Job failed; the body ends with the error trace.
    Error,
}

impl JobState {
    /// The file extension encoding this state.
    ///
    /// `.log` is reserved for [`JobState::Done`] — a finished log is
    /// the only file downstream jobs are allowed to consume.
    pub fn extension(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Running => "running",
            JobState::Done => "log",
            JobState::Error => "error",
        }
    }

    /// Check whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Error)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Pending => "pending",
            JobState::Running => "running",
            JobState::Done => "done",
            JobState::Error => "error",
        };
        f.write_str(s)
    }
}

/// The file path for a job `stem` in a given state.
///
/// Pure — no filesystem access. The stem is the log path minus its
/// `.log` extension.
pub fn state_path(stem: &Path, state: JobState) -> PathBuf {
    let mut os = stem.as_os_str().to_os_string();
    os.push(".");
    os.push(state.extension());
    PathBuf::from(os)
}

/// The stem of a `.log` path, or `None` for any other extension.
pub fn log_stem(path: &Path) -> Option<PathBuf> {
    match path.extension() {
        Some(ext) if ext == "log" => Some(path.with_extension("")),
        _ => None,
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
