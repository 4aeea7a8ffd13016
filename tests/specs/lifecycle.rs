// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle specs: extensions partition a run directory at any time.

use std::path::{Path, PathBuf};

use joblog_engine::{ExecRequest, JobError, JobMonitor};

fn list(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn extensions_partition_the_run_mid_flight() {
    let temp = tempfile::tempdir().unwrap();
    let run_dir = temp.path().join("run");
    let spec = format!("{}/results", temp.path().display());

    // One finished job.
    JobMonitor::scope(run_dir.join("done.log"), "done job", &spec, |_| {
        Box::pin(async { Ok(()) })
    })
    .await
    .unwrap();

    // One failed job.
    let failed: Result<(), JobError> =
        JobMonitor::scope(run_dir.join("broken.log"), "broken job", &spec, |monitor| {
            Box::pin(async move {
                monitor
                    .run(&ExecRequest::new(["sh", "-c", "exit 1"]), false)
                    .await?;
                Ok(())
            })
        })
        .await;
    assert!(failed.is_err());

    // One still in progress.
    let in_flight = JobMonitor::open(run_dir.join("busy.log"), "busy job", &spec).unwrap();

    assert_eq!(
        list(&run_dir),
        vec!["broken.error", "busy.running", "done.log"]
    );
    drop(in_flight);
}

#[tokio::test]
async fn deleting_the_error_report_makes_the_job_rerunnable() {
    let temp = tempfile::tempdir().unwrap();
    let log = temp.path().join("job.log");
    let spec = format!("{}/results", temp.path().display());

    let failed: Result<(), JobError> = JobMonitor::scope(&log, "flaky", &spec, |monitor| {
        Box::pin(async move {
            monitor
                .run(&ExecRequest::new(["sh", "-c", "echo attempt 1; exit 1"]), false)
                .await?;
            Ok(())
        })
    })
    .await;
    assert!(failed.is_err());
    assert!(log.with_extension("error").exists());

    // Re-run: the old report goes away, the job finishes clean.
    JobMonitor::scope(&log, "flaky", &spec, |monitor| {
        Box::pin(async move {
            monitor
                .run(&ExecRequest::new(["sh", "-c", "echo attempt 2"]), false)
                .await?;
            Ok(())
        })
    })
    .await
    .unwrap();

    assert!(log.exists());
    assert!(!log.with_extension("error").exists());
    assert!(!log.with_extension("running").exists());
}

#[tokio::test]
async fn a_downstream_job_halts_on_a_failed_dependency() {
    let temp = tempfile::tempdir().unwrap();
    let spec = format!("{}/results", temp.path().display());
    let upstream = temp.path().join("upstream.log");
    let downstream = temp.path().join("downstream.log");

    let failed: Result<(), JobError> = JobMonitor::scope(&upstream, "upstream", &spec, |_| {
        Box::pin(async {
            Err(JobError::NotALogPath {
                path: PathBuf::from("simulated"),
            })
        })
    })
    .await;
    assert!(failed.is_err());

    let halted: Result<(), JobError> =
        JobMonitor::scope(&downstream, "downstream", &spec, |monitor| {
            let upstream = upstream.clone();
            Box::pin(async move {
                monitor.check_dependencies([upstream.as_path()])?;
                Ok(())
            })
        })
        .await;

    assert!(matches!(halted, Err(JobError::FailedDependency { .. })));
    // The downstream failure is itself durably recorded.
    assert!(downstream.with_extension("error").exists());
}
