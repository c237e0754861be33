use std::path::Path;

use anyhow::Context;

use crate::cli::RunnerCli;
use crate::config::RunConfig;
use crate::duration::parse_run_time;
use crate::supervisor::{
    build_engine_command, headless_budget, interactive_horizon, RunOutcome, SupervisedProcess,
    REPORTS_DIR,
};

/// Run one supervised load test from the given command line arguments.
///
/// Configuration errors are fatal and surface before anything is launched. Engine failures and
/// timeouts are not: they are logged and the run degrades to best-effort report generation, so
/// partial artifacts still produce a report.
pub fn run(cli: RunnerCli) -> anyhow::Result<()> {
    let config = RunConfig::resolve(cli)?;
    let run_time_s = parse_run_time(config.run_time.as_deref());

    let argv = build_engine_command(&config);
    log::info!("Running command: {}", argv.join(" "));

    if config.report_name.is_some() {
        std::fs::create_dir_all(REPORTS_DIR).context("Failed to create the reports directory")?;
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let outcome = runtime.block_on(async {
        let process = SupervisedProcess::launch(&argv, config.headless)?;

        if config.headless {
            process.wait_headless(headless_budget(run_time_s)).await
        } else {
            process.run_interactive(interactive_horizon(run_time_s)).await
        }
    });

    match outcome {
        Ok(RunOutcome::Completed { stdout, stderr }) => {
            log::info!("Engine run completed");
            log_engine_output(&stdout, &stderr);
        }
        Ok(RunOutcome::Failed {
            code,
            stdout,
            stderr,
        }) => {
            match code {
                Some(code) => log::error!("Engine run failed with exit code {code}"),
                None => log::error!("Engine run was stopped by a signal"),
            }
            log_engine_output(&stdout, &stderr);
        }
        Ok(RunOutcome::TimedOut) => {
            log::error!(
                "Engine run exceeded its {}s budget and was stopped",
                headless_budget(run_time_s).as_secs()
            );
        }
        Ok(RunOutcome::Stopped(state)) => {
            log::info!("Engine stopped at the end of the interactive window ({state:?})");
        }
        Err(e) => {
            log::error!("Failed to supervise the engine: {e:?}");
        }
    }

    if let Some(report_name) = &config.report_name {
        log::info!("Generating report for run `{report_name}`");

        // Report generation is best-effort and must never take the orchestrator down with it.
        match gust_summariser::generate_report(report_name, Path::new(REPORTS_DIR)) {
            Ok(output) => {
                log::info!("Summary report written to {}", output.summary_path.display());
                if let Some(plot_path) = &output.plot_path {
                    log::info!("Response time plot written to {}", plot_path.display());
                }
            }
            Err(e) => log::error!("Report generation failed: {e:?}"),
        }
    }

    Ok(())
}

fn log_engine_output(stdout: &str, stderr: &str) {
    if !stdout.is_empty() {
        log::info!("Engine stdout:\n{stdout}");
    }
    if !stderr.is_empty() {
        log::info!("Engine stderr:\n{stderr}");
    }
}
