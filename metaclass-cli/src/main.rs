#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use anyhow::Context;
use atty::Stream;
use clap::Parser;
use cli::{Cli, Commands};
use cmd::{compare, profile, rank, stats, sweep};
use human_panic::setup_panic;
use lazy_static::lazy_static;
use metaclass::model::ModelParams;

use crate::logging::init_logging;
use crate::opts::OutputWriter;
use crate::progress_bar::MetaclassProgressBar;

mod cli;
mod cmd;
mod csv_stat;
mod logging;
mod opts;
mod progress_bar;

lazy_static! {
    pub(crate) static ref PROGRESS_BAR: MetaclassProgressBar = MetaclassProgressBar::new();
}

fn main() -> anyhow::Result<()> {
    setup_panic!();

    let cli: Cli = Cli::parse();

    if !cli.no_progress && atty::is(Stream::Stderr) {
        PROGRESS_BAR.show();
    }

    init_logging(cli.verbose.log_level_filter()).expect("Could not initialize logging");

    match &cli.command {
        Commands::Rank { args, output, all } => {
            let output = OutputWriter::from_path(output)?;

            rank::rank(args, output.into_write(), *all)
                .context("Failed to rank the database")?;
        }
        Commands::Compare { args, output } => {
            let output = OutputWriter::from_path(output)?;

            compare::compare(args, output.into_write())
                .context("Failed to compare the most similar sequences")?;
        }
        Commands::Profile { args, output } => {
            profile::profile(args, output).context("Failed to write complexity profiles")?;
        }
        Commands::Sweep {
            input,
            top_n,
            k_values,
            alpha_values,
            output,
        } => {
            let output = OutputWriter::from_path(output)?;

            sweep::sweep(input, *top_n, k_values, alpha_values, output.into_write())
                .context("Failed to run the parameter sweep")?;
        }
        Commands::Stats { sample, k, alpha } => {
            let model_params = k
                .map(|k| ModelParams::new(k as usize, *alpha))
                .transpose()
                .context("Invalid model parameters")?;

            stats::stats(sample, model_params, std::io::stdout())
                .context("Failed to compute sample statistics")?;
        }
    }

    PROGRESS_BAR.finish();
    Ok(())
}
