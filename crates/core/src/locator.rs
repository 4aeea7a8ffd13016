// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result locators — where a job's real outputs live.
//!
//! A locator is parsed from a folder-or-prefix spec string and turned
//! into concrete file paths on demand. Parsing never touches the
//! filesystem; directories are created lazily by [`ResultLocator::build`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use thiserror::Error;

/// Errors from parsing a locator spec or building a result path.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// The spec string was empty.
    #[error("result locator spec is empty")]
    Empty,

    /// `build` was called with no path segments.
    #[error("result path needs at least one segment")]
    NoSegments,

    /// An ancestor directory of a result path could not be created.
    #[error("failed to create result directory {path}: {source}")]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// Underlying filesystem error.
        source: std::io::Error,
    },
}

/// A parsed `(base directory, name prefix)` pair.
///
/// Two modes, discriminated by a trailing `*` in the spec:
///
/// - **plain** — `"/r/case-1"`: results go into the directory itself,
///   e.g. `/r/case-1/test/R.png`.
/// - **prefixed** — `"/r/case-1_*"`: instead of a uniquely named
///   subdirectory, the prefix is glued onto the next path component,
///   e.g. `/r/case-1_test/R.png`.
///
/// The canonical string form round-trips through [`ResultLocator::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLocator {
    base: PathBuf,
    prefix: Option<String>,
}

impl ResultLocator {
    /// Parse a folder-or-prefix spec.
    ///
    /// A trailing `*` selects prefixed mode: the final path segment
    /// (minus the `*`) becomes the name prefix and its parent becomes
    /// the base directory. Anything else is a plain folder spec.
    pub fn parse(spec: &str) -> Result<Self, LocatorError> {
        if spec.is_empty() {
            return Err(LocatorError::Empty);
        }

        if let Some(stripped) = spec.strip_suffix('*') {
            // Split on the last separator by hand: `Path::file_name`
            // ignores a trailing separator, which would turn `dir/*`
            // into prefix "dir" instead of an empty prefix under `dir`.
            let (base, prefix) = match stripped.rfind(MAIN_SEPARATOR) {
                Some(0) => (MAIN_SEPARATOR.to_string(), &stripped[1..]),
                Some(idx) => (stripped[..idx].to_string(), &stripped[idx + 1..]),
                None => (String::new(), stripped),
            };
            return Ok(Self {
                base: PathBuf::from(base),
                prefix: Some(prefix.to_string()),
            });
        }

        // Plain folder. Normalize away trailing separators so the
        // canonical form is stable (the root itself stays "/").
        let trimmed = spec.trim_end_matches(MAIN_SEPARATOR);
        let base = if trimmed.is_empty() {
            MAIN_SEPARATOR.to_string()
        } else {
            trimmed.to_string()
        };
        Ok(Self {
            base: PathBuf::from(base),
            prefix: None,
        })
    }

    /// The base directory component.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// The name prefix, if in prefixed mode.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Whether this locator is in prefixed mode.
    pub fn is_prefixed(&self) -> bool {
        self.prefix.is_some()
    }

    /// Build a concrete result path from ordered segments.
    ///
    /// In prefixed mode the prefix is concatenated directly onto the
    /// first segment (no separator); remaining segments join as-is.
    ///
    /// Side effect: every ancestor directory of the returned path is
    /// created, idempotently. The final component itself never is —
    /// it is the caller's file to write.
    pub fn build<S: AsRef<str>>(&self, segments: &[S]) -> Result<PathBuf, LocatorError> {
        let (first, rest) = segments.split_first().ok_or(LocatorError::NoSegments)?;

        let mut path = self.base.clone();
        match &self.prefix {
            Some(prefix) => path.push(format!("{prefix}{}", first.as_ref())),
            None => path.push(first.as_ref()),
        }
        for segment in rest {
            path.push(segment.as_ref());
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| LocatorError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        Ok(path)
    }

    /// The reversible canonical string form.
    ///
    /// Plain mode renders the base directory; prefixed mode renders
    /// `<base><sep><prefix>*`. `parse(canonical_string())` reproduces
    /// the same locator.
    pub fn canonical_string(&self) -> String {
        match &self.prefix {
            Some(prefix) => self.base.join(format!("{prefix}*")).display().to_string(),
            None => self.base.display().to_string(),
        }
    }
}

impl fmt::Display for ResultLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_string())
    }
}

#[cfg(test)]
#[path = "locator_tests.rs"]
mod tests;
