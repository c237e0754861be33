mod cli;
mod config;
mod duration;
mod run;
mod supervisor;

pub mod prelude {
    pub use crate::cli::RunnerCli;
    pub use crate::config::{ConfigError, ConfigFile, RunConfig};
    pub use crate::duration::parse_run_time;
    pub use crate::run::run;
    pub use crate::supervisor::{
        build_engine_command, headless_budget, interactive_horizon, ProcessState, RunOutcome,
        SupervisedProcess, REPORTS_DIR, TASKS_DIR,
    };
}
