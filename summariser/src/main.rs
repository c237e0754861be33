use std::path::PathBuf;

use clap::Parser;
use gust_summariser::generate_report;

/// Render the summary document and percentile plot for a completed run.
#[derive(Parser)]
#[command(about, long_about = None)]
struct SummariserCli {
    /// Base name shared by the run's CSV artifacts
    base_name: String,

    /// Directory containing the artifacts, also where the outputs are written
    #[clap(long, default_value = "reports")]
    output_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = SummariserCli::parse();
    let output = generate_report(&cli.base_name, &cli.output_dir)?;

    println!("Summary report: {}", output.summary_path.display());
    if let Some(plot_path) = output.plot_path {
        println!("Response time plot: {}", plot_path.display());
    }

    Ok(())
}
