use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::cli::RunnerCli;

/// A declarative run configuration, loaded from a flat YAML mapping.
///
/// Every field is optional here. Values given on the command line take precedence over values
/// from this file, field by field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub locustfile: Option<String>,
    pub host: Option<String>,
    pub users: Option<u32>,
    pub spawn_rate: Option<u32>,
    pub run_time: Option<String>,
    pub report_name: Option<String>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("`{0}` must be specified either on the command line or in the config file")]
    MissingRequiredField(&'static str),
}

/// The effective configuration for one run, merged from the command line and the optional
/// config file. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub locustfile: String,
    pub host: Option<String>,
    pub users: Option<u32>,
    pub spawn_rate: Option<u32>,
    pub run_time: Option<String>,
    pub headless: bool,
    pub report_name: Option<String>,
    pub html_report: Option<String>,
}

impl RunConfig {
    /// Resolve the effective configuration for this invocation.
    ///
    /// Reading or parsing a config file that was explicitly given is fatal, as is ending up
    /// without a task definition after the merge.
    pub fn resolve(cli: RunnerCli) -> anyhow::Result<Self> {
        let file = match &cli.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };

        Ok(Self::merge(cli, file)?)
    }

    pub(crate) fn merge(cli: RunnerCli, file: ConfigFile) -> Result<Self, ConfigError> {
        let locustfile = prefer(non_empty(cli.locustfile), non_empty(file.locustfile))
            .ok_or(ConfigError::MissingRequiredField("locustfile"))?;

        Ok(Self {
            locustfile,
            host: prefer(non_empty(cli.host), non_empty(file.host)),
            users: prefer(non_zero(cli.users), non_zero(file.users)),
            spawn_rate: prefer(non_zero(cli.spawn_rate), non_zero(file.spawn_rate)),
            run_time: prefer(non_empty(cli.run_time), non_empty(file.run_time)),
            headless: cli.headless,
            report_name: prefer(non_empty(cli.csv), non_empty(file.report_name)),
            html_report: non_empty(cli.html),
        })
    }
}

/// CLI-then-file precedence, applied to every recognised field.
fn prefer<T>(cli: Option<T>, file: Option<T>) -> Option<T> {
    cli.or(file)
}

/// An empty or blank value does not count as provided.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A zero value does not count as provided.
fn non_zero(value: Option<u32>) -> Option<u32> {
    value.filter(|v| *v != 0)
}
