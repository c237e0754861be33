use std::path::{Path, PathBuf};

use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummariseError {
    #[error("expected run artifact {path} not found")]
    ArtifactMissing { path: PathBuf },
    #[error("failed to load {path}: {source}")]
    ArtifactLoad {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}

/// The three CSV artifacts an engine run leaves behind, keyed by a shared base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifactSet {
    pub stats: PathBuf,
    pub failures: PathBuf,
    pub history: PathBuf,
}

impl ReportArtifactSet {
    pub fn resolve(base_name: &str, dir: &Path) -> Self {
        Self {
            stats: dir.join(format!("{base_name}_stats.csv")),
            failures: dir.join(format!("{base_name}_failures.csv")),
            history: dir.join(format!("{base_name}_stats_history.csv")),
        }
    }

    /// Check that each artifact exists before any parsing starts, naming the first one missing.
    pub fn check(&self) -> Result<(), SummariseError> {
        for path in [&self.stats, &self.failures, &self.history] {
            if !path.exists() {
                return Err(SummariseError::ArtifactMissing { path: path.clone() });
            }
        }

        Ok(())
    }

    pub(crate) fn load(&self) -> Result<LoadedArtifacts, SummariseError> {
        self.check()?;

        Ok(LoadedArtifacts {
            stats: load_csv(&self.stats)?,
            failures: load_csv(&self.failures)?,
            history: load_csv(&self.history)?,
        })
    }
}

pub(crate) struct LoadedArtifacts {
    pub stats: DataFrame,
    pub failures: DataFrame,
    pub history: DataFrame,
}

fn load_csv(path: &Path) -> Result<DataFrame, SummariseError> {
    CsvReadOptions::default()
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|source| SummariseError::ArtifactLoad {
            path: path.to_path_buf(),
            source,
        })
}
