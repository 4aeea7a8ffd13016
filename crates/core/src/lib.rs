// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! joblog-core: data model for log-centric job tracking.
//!
//! Every unit of work in a run owns exactly one log file. The file's
//! extension encodes the job's lifecycle state, its first two lines
//! point at wherever the job's real results live, and its body captures
//! whatever the job printed while it ran. This crate holds the pure
//! pieces of that contract: the result locator, the log record format,
//! and the state machine. Process execution lives in `joblog-engine`.

pub mod locator;
pub mod record;
pub mod state;
pub mod time_fmt;
pub mod token;

pub use locator::{LocatorError, ResultLocator};
pub use record::{parse_header, RecordError};
pub use state::{log_stem, state_path, JobState};
pub use time_fmt::format_elapsed;
pub use token::{from_token, to_token};
