// tests/monitor_pipeline.rs

use std::error::Error;
use std::time::Duration;

use mashwatch::errors::MashError;
use mashwatch::feed::{ChangeFeed, scan_tree};
use mashwatch::fs::FileSystem;
use mashwatch::ledger::ERROR_LEDGER_FILE;
use mashwatch::monitor::{CandidateOutcome, MonitorOptions};
use mashwatch_test_utils::builders::{ProjectBuilder, TestProject};
use mashwatch_test_utils::fake_transformer::FakeTransformer;
use mashwatch_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

const MINUTE: Duration = Duration::from_secs(60);

/// `/p` with `src` monitored and `other` not.
fn scenario() -> TestProject {
    ProjectBuilder::new("/p")
        .with_config("src")
        .with_file("src/a.js", MINUTE)
        .with_file("other/b.js", MINUTE)
        .build()
}

fn candidates(project: &TestProject) -> Vec<std::path::PathBuf> {
    scan_tree(&project.fs, &project.root, project.config.matcher()).unwrap()
}

#[tokio::test]
async fn one_cycle_minifies_only_monitored_assets() -> TestResult {
    init_tracing();
    let project = scenario();
    let transformer = FakeTransformer::new(project.shared_fs());
    let mut monitor = project.monitor(transformer.clone());

    let batch = candidates(&project);
    assert_eq!(batch, vec![project.path("src/a.js")]);

    let report = monitor.process_batch(batch).await?;

    assert_eq!(report.transformed, vec![project.path("src/a.js")]);
    assert!(report.failed.is_empty());
    assert_eq!(transformer.calls(), vec![project.path("src/a.js")]);
    assert!(project.exists(&project.path("src/a.min.js")));
    assert!(!project.exists(&project.path("other/b.min.js")));
    Ok(())
}

#[tokio::test]
async fn unmonitored_candidate_is_never_considered() -> TestResult {
    let project = scenario();
    let transformer = FakeTransformer::new(project.shared_fs());
    let mut monitor = project.monitor(transformer.clone());

    let outcome = monitor.process_candidate(&project.path("other/b.js")).await?;

    assert_eq!(outcome, CandidateOutcome::Unmonitored);
    assert!(transformer.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn second_pass_over_unchanged_tree_is_a_no_op() -> TestResult {
    let project = scenario();
    let transformer = FakeTransformer::new(project.shared_fs());
    let mut monitor = project.monitor(transformer.clone());

    monitor.process_batch(candidates(&project)).await?;
    let second = monitor.process_batch(candidates(&project)).await?;

    assert!(second.transformed.is_empty());
    assert_eq!(transformer.calls().len(), 1);
    Ok(())
}

#[tokio::test]
async fn artifacts_fed_back_as_candidates_are_ignored() -> TestResult {
    let project = scenario();
    let transformer = FakeTransformer::new(project.shared_fs());
    let mut monitor = project.monitor(transformer.clone());

    monitor.process_batch(candidates(&project)).await?;

    // The artifact now sits in a monitored directory and shows up in scans.
    let batch = candidates(&project);
    assert!(batch.contains(&project.path("src/a.min.js")));

    let outcome = monitor.process_candidate(&project.path("src/a.min.js")).await?;
    assert_eq!(outcome, CandidateOutcome::NotAnAsset);
    assert_eq!(transformer.calls().len(), 1);
    Ok(())
}

#[tokio::test]
async fn duplicate_candidates_transform_once() -> TestResult {
    let project = scenario();
    let transformer = FakeTransformer::new(project.shared_fs());
    let mut monitor = project.monitor(transformer.clone());
    let a = project.path("src/a.js");

    let report = monitor
        .process_batch(vec![a.clone(), a.clone(), a.clone()])
        .await?;

    assert_eq!(report.transformed.len(), 1);
    assert_eq!(report.skipped, 2);
    assert_eq!(transformer.calls(), vec![a]);
    Ok(())
}

#[tokio::test]
async fn failure_is_recorded_and_not_retried_until_edited() -> TestResult {
    init_tracing();
    let project = scenario();
    let transformer = FakeTransformer::new(project.shared_fs());
    let a = project.path("src/a.js");
    transformer.fail_on(&a);
    let mut monitor = project.monitor(transformer.clone());

    let first = monitor.process_batch(candidates(&project)).await?;
    assert_eq!(first.failed, vec![a.clone()]);
    assert!(monitor.ledger().failed_at(&a).is_some());
    assert_eq!(
        project.fs.read_to_string(&project.path(ERROR_LEDGER_FILE))?,
        format!("{}\n", a.display())
    );

    // Unchanged source: suppressed.
    let outcome = monitor.process_candidate(&a).await?;
    assert_eq!(outcome, CandidateOutcome::Suppressed);
    assert_eq!(transformer.calls().len(), 1);

    // Edit and fix: re-attempted and cleared.
    transformer.stop_failing_on(&a);
    project.touch("src/a.js", MINUTE);

    let outcome = monitor.process_candidate(&a).await?;
    assert_eq!(
        outcome,
        CandidateOutcome::Transformed(project.path("src/a.min.js"))
    );
    assert_eq!(transformer.calls().len(), 2);
    assert!(monitor.ledger().is_empty());
    assert!(!project.exists(&project.path(ERROR_LEDGER_FILE)));
    Ok(())
}

#[tokio::test]
async fn one_failing_asset_does_not_block_the_others() -> TestResult {
    let project = ProjectBuilder::new("/p")
        .with_config("src")
        .with_file("src/a.js", MINUTE)
        .with_file("src/b.css", MINUTE)
        .with_file("src/c.js", MINUTE)
        .build();
    let transformer = FakeTransformer::new(project.shared_fs());
    transformer.fail_on(project.path("src/b.css"));
    let mut monitor = project.monitor(transformer.clone());

    let report = monitor.process_batch(candidates(&project)).await?;

    assert_eq!(
        report.transformed,
        vec![project.path("src/a.js"), project.path("src/c.js")]
    );
    assert_eq!(report.failed, vec![project.path("src/b.css")]);
    Ok(())
}

#[tokio::test]
async fn vanished_candidate_is_skipped_silently() -> TestResult {
    let project = scenario();
    let transformer = FakeTransformer::new(project.shared_fs());
    let mut monitor = project.monitor(transformer.clone());
    let a = project.path("src/a.js");
    project.fs.remove_file(&a)?;

    let outcome = monitor.process_candidate(&a).await?;

    assert_eq!(outcome, CandidateOutcome::Missing);
    assert!(monitor.ledger().is_empty());
    assert!(transformer.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn launch_error_aborts_the_batch() -> TestResult {
    let project = scenario();
    let transformer = FakeTransformer::unlaunchable(project.shared_fs());
    let mut monitor = project.monitor(transformer);

    let err = monitor
        .process_batch(candidates(&project))
        .await
        .unwrap_err();

    assert!(matches!(err, MashError::LaunchError(_)));
    assert!(err.is_fatal());
    assert!(monitor.ledger().is_empty());
    Ok(())
}

#[tokio::test]
async fn run_once_processes_a_single_poll_cycle() -> TestResult {
    init_tracing();
    let project = scenario();
    let transformer = FakeTransformer::new(project.shared_fs());
    let monitor = project.monitor(transformer.clone());

    let feed = ChangeFeed::poll(
        project.root.clone(),
        monitor.matcher(),
        project.shared_fs(),
        Duration::from_millis(10),
    );
    let options = MonitorOptions {
        exit_after_first_batch: true,
    };

    with_timeout(monitor.run(feed, options, std::future::pending::<()>())).await?;

    assert_eq!(transformer.calls(), vec![project.path("src/a.js")]);
    assert!(project.exists(&project.path("src/a.min.js")));
    Ok(())
}

#[tokio::test]
async fn run_stops_on_shutdown() -> TestResult {
    let project = scenario();
    let transformer = FakeTransformer::new(project.shared_fs());
    let monitor = project.monitor(transformer.clone());

    let feed = ChangeFeed::poll(
        project.root.clone(),
        monitor.matcher(),
        project.shared_fs(),
        Duration::from_millis(10),
    );

    let shutdown = tokio::time::sleep(Duration::from_millis(100));
    with_timeout(monitor.run(feed, MonitorOptions::default(), shutdown)).await?;

    // Several cycles ran, but the asset was only minified once.
    assert_eq!(transformer.calls().len(), 1);
    Ok(())
}
