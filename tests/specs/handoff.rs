// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handoff specs: a downstream rule resolves results through the log.

use joblog_core::{to_token, ResultLocator};
use joblog_engine::{JobMonitor, JobResult};

#[tokio::test]
async fn locator_round_trips_through_the_log_header() {
    let temp = tempfile::tempdir().unwrap();
    let log = temp.path().join("job.log");
    let spec = format!("{}/case-1_*", temp.path().display());
    let locator = ResultLocator::parse(&spec).unwrap();

    JobMonitor::scope(&log, "producer", &spec, |_| Box::pin(async { Ok(()) }))
        .await
        .unwrap();

    let result = JobResult::open(&log).unwrap();
    assert_eq!(
        result.locator().canonical_string(),
        locator.canonical_string()
    );
}

#[tokio::test]
async fn downstream_reads_what_the_job_wrote() {
    let temp = tempfile::tempdir().unwrap();
    let log = temp.path().join("count.log");
    let spec = format!("{}/counts", temp.path().display());

    JobMonitor::scope(&log, "count cells", &spec, |monitor| {
        Box::pin(async move {
            let out = monitor.result(&["summary.json"])?;
            std::fs::write(&out, r#"{"total": 17, "flagged": 2}"#).unwrap();
            monitor.log("wrote summary")?;
            Ok(())
        })
    })
    .await
    .unwrap();

    // A later rule only sees the log path.
    let upstream = JobResult::open(&log).unwrap();
    assert_eq!(upstream.description(), "count cells");
    let summary = upstream.parse_json(&["summary.json"]).unwrap();
    assert_eq!(summary, serde_json::json!({"total": 17, "flagged": 2}));
}

#[tokio::test]
async fn wild_descriptions_become_safe_result_names() {
    let temp = tempfile::tempdir().unwrap();
    let log = temp.path().join("job.log");
    let spec = format!("{}/cases_*", temp.path().display());

    let case_name = "patient #7 / scan:2";
    JobMonitor::scope(&log, case_name, &spec, |monitor| {
        let token = to_token(case_name);
        Box::pin(async move {
            let out = monitor.result(&[token.as_str(), "R.json"])?;
            std::fs::write(&out, "{}").unwrap();
            Ok(())
        })
    })
    .await
    .unwrap();

    let upstream = JobResult::open(&log).unwrap();
    let token = to_token(upstream.description());
    let path = upstream.result(&[token.as_str(), "R.json"]).unwrap();
    assert!(path.exists());
    // The token kept the wild name out of the filesystem.
    assert!(!path.display().to_string().contains('#'));
    assert!(!path.display().to_string().contains(':'));
}
