use std::path::{Path, PathBuf};

use anyhow::Context;

mod artifact;
mod plot;
mod render;

pub use artifact::{ReportArtifactSet, SummariseError};

/// Paths written by a successful synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutput {
    pub summary_path: PathBuf,
    /// Only present when the history artifact had rows to plot.
    pub plot_path: Option<PathBuf>,
}

/// Synthesise the report outputs for one run.
///
/// All three CSV artifacts are checked for existence and loaded before anything is written, so
/// a missing or malformed artifact aborts the synthesis without leaving a partial summary
/// behind. The percentile plot is skipped, silently, when the history artifact has no rows.
pub fn generate_report(base_name: &str, output_dir: &Path) -> anyhow::Result<ReportOutput> {
    let artifacts = ReportArtifactSet::resolve(base_name, output_dir);
    let loaded = artifacts.load()?;

    let summary_path = output_dir.join(format!("{base_name}_summary.md"));
    let document = render::summary_document(base_name, &loaded.stats, &loaded.failures);
    std::fs::write(&summary_path, document)
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;
    log::info!("Summary report generated: {}", summary_path.display());

    let plot_path = if loaded.history.height() > 0 {
        let plot_path = output_dir.join(format!("{base_name}_response_time_distribution.png"));
        plot::render_percentile_plot(&loaded.history, &plot_path)?;
        log::info!(
            "Response time distribution plot generated: {}",
            plot_path.display()
        );
        Some(plot_path)
    } else {
        log::debug!("History artifact for `{base_name}` has no rows, skipping the plot");
        None
    };

    Ok(ReportOutput {
        summary_path,
        plot_path,
    })
}
