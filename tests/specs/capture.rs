// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capture specs: command output lands in the log body, deadlock-free.

use std::path::Path;

use joblog_engine::{ExecRequest, JobMonitor};

fn body_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .skip(2)
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn buffered_output_lands_exactly_once() {
    let temp = tempfile::tempdir().unwrap();
    let log = temp.path().join("job.log");
    let spec = format!("{}/results", temp.path().display());

    let final_log = JobMonitor::scope(&log, "printer", &spec, |monitor| {
        Box::pin(async move {
            monitor.run(&ExecRequest::new(["printf", "hello"]), false).await?;
            Ok(())
        })
    })
    .await
    .map(|()| log.clone())
    .unwrap();

    let captured: Vec<String> = body_lines(&final_log)
        .into_iter()
        .filter(|l| l == "[out] hello")
        .collect();
    assert_eq!(captured.len(), 1);
}

#[tokio::test]
async fn interleaved_streams_all_arrive_in_the_log() {
    let temp = tempfile::tempdir().unwrap();
    let log = temp.path().join("job.log");
    let spec = format!("{}/results", temp.path().display());

    JobMonitor::scope(&log, "chatty", &spec, |monitor| {
        Box::pin(async move {
            monitor
                .run(
                    &ExecRequest::new([
                        "sh",
                        "-c",
                        "i=0; while [ $i -lt 1000 ]; do echo out-$i; echo err-$i 1>&2; i=$((i+1)); done",
                    ]),
                    true,
                )
                .await?;
            Ok(())
        })
    })
    .await
    .unwrap();

    let body = body_lines(&log);
    let outs = body.iter().filter(|l| l.starts_with("[out] out-")).count();
    let errs = body.iter().filter(|l| l.starts_with("[err] err-")).count();
    assert_eq!(outs, 1000);
    assert_eq!(errs, 1000);
}

#[tokio::test]
async fn failed_command_output_survives_in_the_error_report() {
    let temp = tempfile::tempdir().unwrap();
    let log = temp.path().join("job.log");
    let spec = format!("{}/results", temp.path().display());

    let result = JobMonitor::scope(&log, "crasher", &spec, |monitor| {
        Box::pin(async move {
            monitor
                .run(
                    &ExecRequest::new(["sh", "-c", "echo partial result; echo warning 1>&2; exit 9"]),
                    true,
                )
                .await?;
            Ok(())
        })
    })
    .await;
    assert!(result.is_err());

    let body = body_lines(&log.with_extension("error"));
    assert!(body.iter().any(|l| l == "[out] partial result"));
    assert!(body.iter().any(|l| l == "[err] warning"));
    assert!(body.iter().any(|l| l.contains("exited with code 9")));
}
