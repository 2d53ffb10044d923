//! matscope - Print the variables inside MATLAB .mat files.
//!
//! This tool loads Level 5 and (with the `hdf5` feature) v7.3 MAT files and
//! prints each variable as a tree with value previews or as a one-line
//! summary.

mod cli;
mod output;
mod show;

use anyhow::Result;
use clap::Parser;

use cli::Args;

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.default_log_filter()),
    )
    .init();

    if let Err(e) = run(args) {
        output::print_error(&e);
        std::process::exit(1);
    }
}

/// Main dispatch function.
fn run(args: Args) -> Result<()> {
    show::run(&args)
}
