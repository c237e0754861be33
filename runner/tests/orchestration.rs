use std::time::Duration;

use clap::Parser;
use gust_runner::prelude::*;

/// A short headless run that leaves a report behind.
fn run1_cli() -> RunnerCli {
    RunnerCli::parse_from([
        "gust-runner",
        "-f",
        "basic_api_test.py",
        "-u",
        "5",
        "-r",
        "1",
        "-t",
        "10s",
        "--headless",
        "--csv",
        "run1",
    ])
}

#[test]
fn run1_launches_with_a_seventy_second_budget() {
    let config = RunConfig::resolve(run1_cli()).unwrap();

    assert!(config.headless);
    assert_eq!(config.report_name.as_deref(), Some("run1"));

    let run_time_s = parse_run_time(config.run_time.as_deref());
    assert_eq!(headless_budget(run_time_s), Duration::from_secs(70));

    let argv = build_engine_command(&config);
    assert_eq!(argv[..3], ["locust", "-f", "locust_files/basic_api_test.py"]);
    assert!(argv.contains(&"--headless".to_string()));
    assert!(argv.windows(2).any(|w| w == ["--csv", "reports/run1"]));
}

/// Supervise a stand-in engine that writes the three CSV artifacts, then synthesise the report
/// from them, end to end.
#[tokio::test]
async fn successful_run_feeds_report_synthesis() {
    let dir = tempfile::tempdir().unwrap();

    let script = format!(
        r#"
        cd {dir}
        printf 'Type,Name,Request Count\nGET,/status,100\n' > run1_stats.csv
        printf 'Method,Name,Error,Occurrences\n' > run1_failures.csv
        printf 'Timestamp,50%%,95%%\n1700000000,12,40\n1700000005,14,44\n' > run1_stats_history.csv
        echo 'run finished'
        "#,
        dir = dir.path().display()
    );
    let argv = vec!["sh".to_string(), "-c".to_string(), script];

    let process = SupervisedProcess::launch(&argv, true).unwrap();
    let outcome = process.wait_headless(headless_budget(0)).await.unwrap();

    match outcome {
        RunOutcome::Completed { stdout, .. } => assert_eq!(stdout, "run finished\n"),
        outcome => panic!("Expected a completed run, got {outcome:?}"),
    }

    let output = gust_summariser::generate_report("run1", dir.path()).unwrap();

    let summary = std::fs::read_to_string(&output.summary_path).unwrap();
    assert!(summary.contains("## Summary Statistics"));
    assert!(summary.contains("## Failures"));
    assert!(output.plot_path.unwrap().exists());
}

/// A failed engine run must still leave the supervisor in a state where report synthesis can be
/// attempted against whatever artifacts were written.
#[tokio::test]
async fn failed_run_still_leaves_artifacts_for_synthesis() {
    let dir = tempfile::tempdir().unwrap();

    let script = format!(
        r#"
        cd {dir}
        printf 'Type,Name,Request Count\nGET,/status,10\n' > run2_stats.csv
        printf 'Method,Name,Error,Occurrences\nGET,/status,Connection refused,10\n' > run2_failures.csv
        printf 'Timestamp,50%%,95%%\n' > run2_stats_history.csv
        exit 1
        "#,
        dir = dir.path().display()
    );
    let argv = vec!["sh".to_string(), "-c".to_string(), script];

    let process = SupervisedProcess::launch(&argv, true).unwrap();
    let outcome = process.wait_headless(headless_budget(0)).await.unwrap();

    assert!(matches!(outcome, RunOutcome::Failed { code: Some(1), .. }));

    let output = gust_summariser::generate_report("run2", dir.path()).unwrap();
    assert!(output.summary_path.exists());
    assert_eq!(output.plot_path, None);
}
