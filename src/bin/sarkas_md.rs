//! Thin CLI driver: load configuration, build and run the simulation, map
//! errors to an exit code.
//!
//! Grounded in `NNPDF-pineappl/pineappl_cli/src/main.rs`'s `clap::Parser` +
//! `ExitCode` pattern.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::error;

use sarkas_md::config::Configuration;
use sarkas_md::Simulation;

#[derive(Parser, Debug)]
#[command(name = "sarkas_md", about = "Molecular dynamics engine for strongly coupled plasmas")]
struct Cli {
    /// Path to the YAML configuration document.
    config: PathBuf,

    /// Override the job id used for checkpoint/log file naming.
    #[arg(long)]
    job_id: Option<String>,

    /// Directory checkpoints and logs are written to.
    #[arg(long, default_value = ".")]
    job_dir: PathBuf,

    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: Cli) -> Result<()> {
    let contents = std::fs::read_to_string(&cli.config)
        .with_context(|| format!("failed to read configuration file {}", cli.config.display()))?;
    let mut config: Configuration = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse configuration file {}", cli.config.display()))?;
    if let Some(job_id) = cli.job_id {
        config.control.job_id = job_id;
    }

    let mut simulation = Simulation::new(config).context("failed to initialize simulation")?;
    simulation.run().context("simulation run failed")?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
