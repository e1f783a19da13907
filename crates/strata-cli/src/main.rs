//! Strata command-line interface.
//!
//! ```sh
//! strata local --processes 12
//! strata coordinator --listen 0.0.0.0:7400 --processes 4 --config job.toml
//! strata worker --connect 10.0.0.1:7400 --rank 1
//! strata validate --config job.toml
//! ```

mod config;
mod runner;

use std::net::SocketAddr;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;

use crate::config::JobArgs;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Distributed explicit heat diffusion on a 2D grid")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run coordinator and workers as threads of this process.
    Local {
        /// Total process count, coordinator included (at least 2).
        #[arg(short, long)]
        processes: Option<usize>,
        #[command(flatten)]
        job: JobArgs,
    },
    /// Act as rank 0 of a TCP cluster.
    Coordinator {
        /// Address to accept workers on.
        #[arg(short, long)]
        listen: SocketAddr,
        /// Total process count, coordinator included (at least 2).
        #[arg(short, long)]
        processes: Option<usize>,
        #[command(flatten)]
        job: JobArgs,
    },
    /// Join a TCP cluster as a worker.
    ///
    /// Without job parameters the worker adopts the coordinator's
    /// configuration; with them it refuses a coordinator that disagrees.
    Worker {
        /// Coordinator address.
        #[arg(long)]
        connect: SocketAddr,
        /// This worker's rank (1 or greater).
        #[arg(short, long)]
        rank: u32,
        #[command(flatten)]
        job: JobArgs,
    },
    /// Check a job without running it.
    Validate {
        /// Total process count, coordinator included.
        #[arg(short, long)]
        processes: Option<usize>,
        #[command(flatten)]
        job: JobArgs,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Local { processes, job } => {
            let mut job = job.resolve()?;
            if let Some(p) = processes {
                job.run.processes = p;
            }
            let report = runner::local(&job)?;
            println!("{report}");
        }
        Commands::Coordinator {
            listen,
            processes,
            job,
        } => {
            let mut job = job.resolve()?;
            if let Some(p) = processes {
                job.run.processes = p;
            }
            let report = runner::coordinator(&job, listen)?;
            println!("{report}");
        }
        Commands::Worker { connect, rank, job } => {
            let expected = if job.pins_run_config() {
                Some(job.resolve()?.run_config())
            } else {
                None
            };
            let summary = runner::worker(connect, rank, expected)?;
            info!(
                "worker {} done: {} rounds, {} computed, {} idle",
                summary.rank, summary.rounds, summary.computed, summary.skipped
            );
        }
        Commands::Validate { processes, job } => {
            let mut resolved = job.resolve()?;
            if let Some(p) = processes {
                resolved.run.processes = p;
            }
            let config = resolved.run_config();
            config.validate().context("invalid run configuration")?;
            let workers = strata_core::worker_count(resolved.run.processes)?;
            if !config.coefficients.is_stable() {
                log::warn!(
                    "cx + cy = {} exceeds 0.5; the explicit scheme will diverge",
                    config.coefficients.cx + config.coefficients.cy
                );
            }
            println!(
                "valid: {}x{} grid, {} timesteps, {} workers, fingerprint {:016x}",
                config.rows,
                config.cols,
                config.timesteps,
                workers,
                config.fingerprint()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_line_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn worker_flags_parse() {
        let cli = Cli::try_parse_from([
            "strata", "worker", "--connect", "127.0.0.1:7400", "--rank", "3", "--timesteps", "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Worker { connect, rank, job } => {
                assert_eq!(connect.port(), 7400);
                assert_eq!(rank, 3);
                assert_eq!(job.timesteps, Some(5));
                assert!(job.pins_run_config());
            }
            _ => panic!("expected worker subcommand"),
        }
    }

    #[test]
    fn local_requires_no_arguments() {
        let cli = Cli::try_parse_from(["strata", "local"]).unwrap();
        assert!(matches!(cli.command, Commands::Local { processes: None, .. }));
    }
}
