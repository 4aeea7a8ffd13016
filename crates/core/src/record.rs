// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The on-disk log record format.
//!
//! Plain text, line oriented:
//!
//! ```text
//! line 1:  <description>
//! line 2:  <canonical locator string>
//! line 3+: <body: streamed command output and/or error trace>
//! ```
//!
//! The header is written once and never rewritten; body lines are only
//! ever appended. Each append opens, writes, and closes the file —
//! safe for the low write frequency of job events.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::locator::{LocatorError, ResultLocator};

/// Errors reading or writing a log record.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The log file does not exist.
    #[error("log file not found: {path}")]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Filesystem failure on the log file.
    #[error("log file {path}: {source}")]
    Io {
        /// The log file path.
        path: PathBuf,
        /// Underlying filesystem error.
        source: std::io::Error,
    },

    /// The file has fewer than the two header lines.
    #[error("log file {path} is truncated: missing header lines")]
    MissingHeader {
        /// The log file path.
        path: PathBuf,
    },

    /// Line 2 does not parse as a locator string.
    #[error("log file {path} has a malformed locator line: {source}")]
    BadLocator {
        /// The log file path.
        path: PathBuf,
        /// The locator parse failure.
        source: LocatorError,
    },
}

/// Write the two-line header, creating or truncating the file.
///
/// The parent directory must already exist — a missing parent is the
/// caller's error, not silently repaired here. Newlines inside the
/// description are flattened to spaces so line 2 stays the locator.
pub fn write_header(
    path: &Path,
    description: &str,
    locator: &ResultLocator,
) -> Result<(), RecordError> {
    let description = description.replace(['\r', '\n'], " ");
    let contents = format!("{description}\n{}\n", locator.canonical_string());
    fs::write(path, contents).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Append one body line.
pub fn append_line(path: &Path, text: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{text}")
}

/// Parse the header back out of a log file.
///
/// Fails if the file is missing, has fewer than two lines, or line 2
/// is not a valid locator string. The body is not read.
pub fn parse_header(path: &Path) -> Result<(String, ResultLocator), RecordError> {
    let contents = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            RecordError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            RecordError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let mut lines = contents.lines();
    let description = lines.next().ok_or_else(|| RecordError::MissingHeader {
        path: path.to_path_buf(),
    })?;
    let locator_line = lines.next().ok_or_else(|| RecordError::MissingHeader {
        path: path.to_path_buf(),
    })?;

    let locator =
        ResultLocator::parse(locator_line).map_err(|source| RecordError::BadLocator {
            path: path.to_path_buf(),
            source,
        })?;
    Ok((description.to_string(), locator))
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
