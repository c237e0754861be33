use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use crate::config::RunConfig;

/// The load-generation engine binary, expected to be on the PATH.
const ENGINE_BIN: &str = "locust";

/// Directory that task definitions are resolved against.
pub const TASKS_DIR: &str = "locust_files";

/// Directory that run artifacts and reports are written to.
pub const REPORTS_DIR: &str = "reports";

/// Extra wall-clock budget on top of the configured run time before a headless run is stopped.
const HEADLESS_TIMEOUT_BUFFER: Duration = Duration::from_secs(60);

/// Extra time an interactive run is left alive beyond the configured run time.
const INTERACTIVE_RUN_BUFFER: Duration = Duration::from_secs(30);

/// How long a graceful stop request is given before the process is killed.
const TERMINATION_GRACE: Duration = Duration::from_secs(10);

/// Wall-clock budget for a headless run with the given configured run time.
pub fn headless_budget(run_time_s: u64) -> Duration {
    Duration::from_secs(run_time_s) + HEADLESS_TIMEOUT_BUFFER
}

/// How long an interactive run is left to the operator before termination starts.
pub fn interactive_horizon(run_time_s: u64) -> Duration {
    Duration::from_secs(run_time_s) + INTERACTIVE_RUN_BUFFER
}

/// Render the engine command line for the given run configuration.
///
/// Optional fields are only appended when they were configured. A configured report name turns
/// into both the CSV base name and the HTML report path for the engine.
pub fn build_engine_command(config: &RunConfig) -> Vec<String> {
    let mut argv = vec![
        ENGINE_BIN.to_string(),
        "-f".to_string(),
        Path::new(TASKS_DIR)
            .join(&config.locustfile)
            .display()
            .to_string(),
    ];

    if let Some(host) = &config.host {
        argv.push("--host".to_string());
        argv.push(host.clone());
    }
    if let Some(users) = config.users {
        argv.push("-u".to_string());
        argv.push(users.to_string());
    }
    if let Some(spawn_rate) = config.spawn_rate {
        argv.push("-r".to_string());
        argv.push(spawn_rate.to_string());
    }
    if let Some(run_time) = &config.run_time {
        argv.push("-t".to_string());
        argv.push(run_time.clone());
    }
    if config.headless {
        argv.push("--headless".to_string());
    }
    if let Some(report_name) = &config.report_name {
        argv.push("--csv".to_string());
        argv.push(Path::new(REPORTS_DIR).join(report_name).display().to_string());
        argv.push("--html".to_string());
        argv.push(config.html_report.clone().unwrap_or_else(|| {
            Path::new(REPORTS_DIR)
                .join(format!("{report_name}.html"))
                .display()
                .to_string()
        }));
    }

    argv
}

/// Lifecycle states of a supervised engine process.
///
/// Both run modes share the same state machine, in particular the `Terminating` to
/// `Exited`/`Killed` escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Launched,
    Running,
    TimedOut,
    Exited,
    Terminating,
    Killed,
}

/// The terminal result of supervising one engine run.
#[derive(Debug)]
pub enum RunOutcome {
    /// The engine exited cleanly before the budget ran out.
    Completed { stdout: String, stderr: String },
    /// The engine exited with a non-zero status. Recoverable: partial artifacts may still be
    /// usable for a report.
    Failed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    /// The wall-clock budget ran out and the engine was stopped. Recoverable, like `Failed`.
    TimedOut,
    /// An interactive run reached the end of its window and was stopped.
    Stopped(ProcessState),
}

/// Owns one spawned engine process from launch until it reaches a terminal state.
#[derive(Debug)]
pub struct SupervisedProcess {
    child: Child,
    state: ProcessState,
}

impl SupervisedProcess {
    /// Spawn the engine process from a rendered command line.
    ///
    /// Headless runs capture stdout/stderr so they can be surfaced after the run; interactive
    /// runs leave the streams attached to the terminal for the operator.
    pub fn launch(argv: &[String], capture_output: bool) -> anyhow::Result<Self> {
        let (program, args) = argv
            .split_first()
            .context("Cannot launch an empty command line")?;

        let mut command = Command::new(program);
        command.args(args);
        if capture_output {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
        }

        let child = command
            .spawn()
            .with_context(|| format!("Failed to launch `{program}`"))?;

        Ok(Self {
            child,
            state: ProcessState::Launched,
        })
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Block until the engine exits or the wall-clock budget runs out.
    ///
    /// A run that exceeds its budget is funnelled into the same termination escalation as an
    /// interactive run, then reported as [RunOutcome::TimedOut].
    pub async fn wait_headless(mut self, budget: Duration) -> anyhow::Result<RunOutcome> {
        self.state = ProcessState::Running;

        // Drain the output streams concurrently so a chatty engine cannot fill the pipe buffers
        // and block its own exit.
        let stdout = drain(self.child.stdout.take());
        let stderr = drain(self.child.stderr.take());

        match tokio::time::timeout(budget, self.child.wait()).await {
            Ok(status) => {
                let status = status.context("Failed to wait for the engine process")?;
                self.state = ProcessState::Exited;

                let stdout = stdout.await.unwrap_or_default();
                let stderr = stderr.await.unwrap_or_default();

                if status.success() {
                    Ok(RunOutcome::Completed { stdout, stderr })
                } else {
                    Ok(RunOutcome::Failed {
                        code: status.code(),
                        stdout,
                        stderr,
                    })
                }
            }
            Err(_) => {
                self.state = ProcessState::TimedOut;
                self.terminate_with_grace(TERMINATION_GRACE).await?;
                Ok(RunOutcome::TimedOut)
            }
        }
    }

    /// Leave the engine to the operator for the given window, then stop it.
    ///
    /// The termination sequence always runs to completion, tolerating an engine that was already
    /// stopped through its own interface.
    pub async fn run_interactive(mut self, horizon: Duration) -> anyhow::Result<RunOutcome> {
        self.state = ProcessState::Running;

        tokio::time::sleep(horizon).await;

        let state = self.terminate_with_grace(TERMINATION_GRACE).await?;
        Ok(RunOutcome::Stopped(state))
    }

    /// Request a graceful stop, then force-kill if the process is still running once the grace
    /// window has passed.
    async fn terminate_with_grace(&mut self, grace: Duration) -> anyhow::Result<ProcessState> {
        self.state = ProcessState::Terminating;
        self.request_graceful_stop();

        match tokio::time::timeout(grace, self.child.wait()).await {
            Ok(status) => {
                status.context("Failed to wait for the engine process to stop")?;
                self.state = ProcessState::Exited;
            }
            Err(_) => {
                self.child
                    .kill()
                    .await
                    .context("Failed to kill the engine process")?;
                self.state = ProcessState::Killed;
            }
        }

        Ok(self.state)
    }

    fn request_graceful_stop(&self) {
        #[cfg(unix)]
        if let Some(pid) = self.child.id() {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            // ESRCH means the process already exited, which is fine here.
            if let Err(errno) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
                if errno != nix::errno::Errno::ESRCH {
                    log::warn!("Failed to send SIGTERM to engine process {pid}: {errno}");
                }
            }
        }

        #[cfg(not(unix))]
        log::warn!("Graceful stop is not supported on this platform, the engine will be killed");
    }
}

fn drain<R: AsyncRead + Unpin + Send + 'static>(reader: Option<R>) -> JoinHandle<String> {
    tokio::spawn(async move {
        let mut buffer = String::new();
        if let Some(mut reader) = reader {
            reader.read_to_string(&mut buffer).await.ok();
        }
        buffer
    })
}
