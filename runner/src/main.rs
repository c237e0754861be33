use clap::Parser;
use gust_runner::prelude::{run, RunnerCli};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    run(RunnerCli::parse())
}
