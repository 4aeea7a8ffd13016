// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! joblog-engine: the side-effecting half of the log-centric job contract.
//!
//! A [`JobMonitor`] owns a job's log file for the duration of a unit of
//! work: it marks the job running, builds result paths, streams child
//! process output into the log, and finalizes the file as done or
//! failed. A [`JobResult`] is the read-only counterpart a downstream
//! job uses to find a predecessor's results.
//!
//! The host workflow engine guarantees at most one writer per log path;
//! nothing here takes cross-process locks.

pub mod error;
pub mod monitor;
pub mod result;
pub mod runner;

pub use error::JobError;
pub use monitor::JobMonitor;
pub use result::JobResult;
pub use runner::{CaptureMode, CaptureSink, ExecRequest, RunnerError};
