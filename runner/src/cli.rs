use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
pub struct RunnerCli {
    /// Name of the task definition to run, resolved against the tasks directory
    #[clap(short = 'f', long)]
    pub locustfile: Option<String>,

    /// The target host to load test (e.g. http://localhost:8080)
    #[clap(long)]
    pub host: Option<String>,

    /// The number of concurrent users to simulate
    #[clap(short, long)]
    pub users: Option<u32>,

    /// The rate at which users are spawned, per second
    #[clap(short = 'r', long)]
    pub spawn_rate: Option<u32>,

    /// Stop after the given run time, e.g. 300s, 20m, 3h
    #[clap(short = 't', long)]
    pub run_time: Option<String>,

    /// Run without the web UI and exit when the run completes
    #[clap(long, default_value = "false")]
    pub headless: bool,

    /// Base name for the CSV artifacts written by the run, also used for the summary report
    #[clap(long)]
    pub csv: Option<String>,

    /// Override the path of the HTML report written by the engine
    #[clap(long)]
    pub html: Option<String>,

    /// Path to a YAML configuration file
    #[clap(long)]
    pub config: Option<PathBuf>,
}
