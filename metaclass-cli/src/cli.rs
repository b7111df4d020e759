use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use metaclass::context_spec::MAX_ORDER;

use crate::opts::{directory, input_stream, positive_float, Directory, InputStream};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    /// Don't display a progress bar/spinner
    #[clap(long, global = true, value_parser)]
    pub no_progress: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

/// Context model parameters.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Context order: number of preceding acids the model conditions on
    #[clap(short, long = "order", value_name = "ORDER", value_parser = clap::value_parser!(u32).range(1..=MAX_ORDER as i64))]
    pub k: u32,

    /// Smoothing constant added to every acid count
    #[clap(short, long, value_parser = positive_float)]
    pub alpha: f64,
}

/// Inputs of the ranking: the reference database and the sample.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Reference database file (`@identifier` lines followed by sequence
    /// lines; may be gzipped); `-` is the standard input
    #[clap(short, long, value_parser = input_stream)]
    pub database: InputStream,

    /// Metagenomic sample file (may be gzipped); `-` is the standard input
    #[clap(short, long, value_parser = input_stream)]
    pub sample: InputStream,
}

#[derive(Args, Debug, Clone)]
pub struct RankArgs {
    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub model: ModelArgs,

    /// Number of most similar sequences to select
    #[clap(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub top_n: u32,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank reference database sequences by their similarity to the sample
    Rank {
        #[clap(flatten)]
        args: RankArgs,

        /// Output CSV file path; `-` is the standard output
        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,

        /// Output every scored sequence instead of the top ones only
        #[clap(long, value_parser)]
        all: bool,
    },

    /// Compute the NRC matrix between the most similar database sequences
    Compare {
        #[clap(flatten)]
        args: RankArgs,

        /// Output CSV file path; `-` is the standard output
        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,
    },

    /// Write complexity profiles of the most similar database sequences
    Profile {
        #[clap(flatten)]
        args: RankArgs,

        /// Output directory path; created if it does not exist
        #[clap(short, long, value_parser = directory)]
        output: Directory,
    },

    /// Rank the database for every combination of given parameters
    Sweep {
        #[clap(flatten)]
        input: InputArgs,

        /// Number of most similar sequences to keep for each combination
        #[clap(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        top_n: u32,

        /// Context orders to try
        #[clap(long, value_delimiter = ',', default_values = &["2", "3", "4", "5", "6"], value_parser = clap::value_parser!(u32).range(1..=MAX_ORDER as i64))]
        k_values: Vec<u32>,

        /// Smoothing constants to try
        #[clap(long, value_delimiter = ',', default_values = &["0.1", "0.5", "1.0", "2.0"], value_parser = positive_float)]
        alpha_values: Vec<f64>,

        /// Output JSON file path; `-` is the standard output
        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,
    },

    /// Print statistics about a sample file
    Stats {
        /// Sample file to read; `-` is the standard input
        #[clap(short, long, default_value_t, value_parser = input_stream)]
        sample: InputStream,

        /// Also train a model of given order and report its statistics
        #[clap(short, long = "order", value_name = "ORDER", value_parser = clap::value_parser!(u32).range(1..=MAX_ORDER as i64))]
        k: Option<u32>,

        /// Smoothing constant used with `--order`
        #[clap(short, long, default_value_t = 1.0, value_parser = positive_float)]
        alpha: f64,
    },
}
