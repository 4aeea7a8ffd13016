// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Elapsed-time formatting for log body lines.

use std::time::Duration;

/// Format a duration as `hh:mm:ss`.
///
/// Hours widen past two digits for very long jobs rather than wrapping.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
